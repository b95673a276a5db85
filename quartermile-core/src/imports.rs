//! Names used throughout the crate, glob-imported by every model module

#![allow(unused_imports)]

pub(crate) use crate::error::SimError;
pub(crate) use crate::traits::*;
pub(crate) use crate::utils;
pub(crate) use quartermile_proc_macros::{ApproxEq, HistoryVec};

pub(crate) use anyhow::{bail, ensure, Context};
pub(crate) use ndarray::prelude::*;
pub(crate) use serde::{Deserialize, Serialize};
pub(crate) use std::{ffi::OsStr, fs::File, path::Path};
