use crate::imports::*;
use std::collections::HashMap;
use std::io::{Read, Write};

/// Encodings understood by [`SerdeAPI`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
    Bincode,
}

impl Format {
    /// Parses a file extension or format name, leading dot and case ignored
    pub fn parse(name: &str) -> anyhow::Result<Self> {
        Ok(match name.trim_start_matches('.').to_lowercase().as_str() {
            "yaml" | "yml" => Self::Yaml,
            "json" => Self::Json,
            "bin" | "bincode" => Self::Bincode,
            _ => bail!("Unsupported format {name:?}, expected one of yaml, yml, json, bin"),
        })
    }

    /// Format implied by the extension of `path`
    pub fn of_path(path: &Path) -> anyhow::Result<Self> {
        let ext = path
            .extension()
            .and_then(OsStr::to_str)
            .with_context(|| format!("File extension could not be parsed: {path:?}"))?;
        Self::parse(ext)
    }
}

/// Serialization entry points shared by every persisted type. Anything
/// deserialized goes through [`init`](SerdeAPI::init) before it is returned.
pub trait SerdeAPI: Serialize + for<'a> Deserialize<'a> {
    /// Validation or derived-state setup run after deserialization
    fn init(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    #[doc(hidden)]
    fn initialized(mut self) -> anyhow::Result<Self> {
        self.init()?;
        Ok(self)
    }

    /// Reads an object from a file bundled in the crate's `resources` folder
    #[cfg(feature = "resources")]
    fn from_resource<P: AsRef<Path>>(filepath: P) -> anyhow::Result<Self> {
        let filepath = filepath.as_ref();
        let format = Format::of_path(filepath)?;
        let file = crate::resources::RESOURCES_DIR
            .get_file(filepath)
            .with_context(|| format!("File not found in resources: {filepath:?}"))?;
        Self::from_reader(file.contents(), format)
    }

    /// Writes the object to `filepath`, format chosen by extension.
    /// An existing file is truncated.
    fn to_file<P: AsRef<Path>>(&self, filepath: P) -> anyhow::Result<()> {
        let filepath = filepath.as_ref();
        let format = Format::of_path(filepath)?;
        let file = File::create(filepath)
            .with_context(|| format!("Could not create file: {filepath:?}"))?;
        self.to_writer(file, format)
    }

    /// Reads the object from `filepath`, format chosen by extension
    fn from_file<P: AsRef<Path>>(filepath: P) -> anyhow::Result<Self> {
        let filepath = filepath.as_ref();
        let format = Format::of_path(filepath)?;
        let file = File::open(filepath).with_context(|| {
            if filepath.exists() {
                format!("Could not open file: {filepath:?}")
            } else {
                format!("File not found: {filepath:?}")
            }
        })?;
        Self::from_reader(file, format)
    }

    fn to_writer<W: Write>(&self, wtr: W, format: Format) -> anyhow::Result<()> {
        match format {
            Format::Yaml => serde_yaml::to_writer(wtr, self)?,
            Format::Json => serde_json::to_writer(wtr, self)?,
            Format::Bincode => bincode::serialize_into(wtr, self)?,
        }
        Ok(())
    }

    fn from_reader<R: Read>(rdr: R, format: Format) -> anyhow::Result<Self> {
        let deserialized: Self = match format {
            Format::Yaml => serde_yaml::from_reader(rdr)?,
            Format::Json => serde_json::from_reader(rdr)?,
            Format::Bincode => bincode::deserialize_from(rdr)?,
        };
        deserialized.initialized()
    }

    fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    fn from_json<S: AsRef<str>>(json_str: S) -> anyhow::Result<Self> {
        serde_json::from_str::<Self>(json_str.as_ref())?.initialized()
    }

    fn to_yaml(&self) -> anyhow::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    fn from_yaml<S: AsRef<str>>(yaml_str: S) -> anyhow::Result<Self> {
        serde_yaml::from_str::<Self>(yaml_str.as_ref())?.initialized()
    }

    fn to_bincode(&self) -> anyhow::Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    fn from_bincode(encoded: &[u8]) -> anyhow::Result<Self> {
        bincode::deserialize::<Self>(encoded)?.initialized()
    }
}

/// Equality within a tolerance, used to compare simulation outputs
pub trait ApproxEq<Rhs = Self> {
    fn approx_eq(&self, other: &Rhs, tol: f64) -> bool;
}

macro_rules! impl_exact_approx_eq {
    ($($t: ty),*) => {
        $(
            impl ApproxEq for $t {
                fn approx_eq(&self, other: &$t, _tol: f64) -> bool {
                    self == other
                }
            }
        )*
    }
}

impl_exact_approx_eq!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, bool, &str, String);

/// True if `a` and `b` are within `tol` of each other, either absolutely or
/// relative to their mean magnitude
fn floats_close(a: f64, b: f64, tol: f64) -> bool {
    if a == b {
        return true;
    }
    let diff = (a - b).abs();
    diff < tol || diff / (0.5 * (a.abs() + b.abs())) < tol
}

impl ApproxEq for f64 {
    fn approx_eq(&self, other: &f64, tol: f64) -> bool {
        floats_close(*self, *other, tol)
    }
}

impl ApproxEq for f32 {
    fn approx_eq(&self, other: &f32, tol: f64) -> bool {
        floats_close(*self as f64, *other as f64, tol)
    }
}

impl<T: ApproxEq> ApproxEq for Vec<T> {
    fn approx_eq(&self, other: &Vec<T>, tol: f64) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a.approx_eq(b, tol))
    }
}

impl<T: ApproxEq> ApproxEq for Array1<T> {
    fn approx_eq(&self, other: &Array1<T>, tol: f64) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a.approx_eq(b, tol))
    }
}

impl<T: ApproxEq> ApproxEq for Option<T> {
    fn approx_eq(&self, other: &Option<T>, tol: f64) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.approx_eq(b, tol),
            (a, b) => a.is_none() && b.is_none(),
        }
    }
}

impl<A: ApproxEq, B: ApproxEq> ApproxEq for (A, B) {
    fn approx_eq(&self, other: &(A, B), tol: f64) -> bool {
        self.0.approx_eq(&other.0, tol) && self.1.approx_eq(&other.1, tol)
    }
}

impl<K, V> ApproxEq for HashMap<K, V>
where
    K: Eq + std::hash::Hash,
    V: ApproxEq,
{
    fn approx_eq(&self, other: &HashMap<K, V>, tol: f64) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get(k).map_or(false, |w| v.approx_eq(w, tol)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        assert_eq!(Format::parse(".YML").unwrap(), Format::Yaml);
        assert_eq!(Format::parse("bin").unwrap(), Format::Bincode);
        assert!(Format::parse("toml").is_err());
        assert_eq!(
            Format::of_path(Path::new("dir/car.json")).unwrap(),
            Format::Json
        );
        assert!(Format::of_path(Path::new("car")).is_err());
    }

    #[test]
    fn test_approx_eq_floats() {
        assert!(1.0_f64.approx_eq(&1.0, 0.0));
        assert!(100.0_f64.approx_eq(&100.001, 1e-4));
        assert!(!100.0_f64.approx_eq(&101.0, 1e-4));
        assert!(0.0_f64.approx_eq(&1e-12, 1e-9));
        assert!(!f64::NAN.approx_eq(&1.0, 1.0));
    }

    #[test]
    fn test_approx_eq_containers() {
        assert!(vec![1.0, 2.0].approx_eq(&vec![1.0, 2.0 + 1e-12], 1e-9));
        assert!(!vec![1.0, 2.0].approx_eq(&vec![1.0], 1e-9));
        assert!(Some(3.0).approx_eq(&Some(3.0), 0.0));
        assert!(!Some(3.0).approx_eq(&None, 1.0));
        assert!(None::<f64>.approx_eq(&None, 0.0));
        assert!(array![1.0, 2.0].approx_eq(&array![1.0, 2.0], 0.0));
        assert!((1.0, 2).approx_eq(&(1.0 + 1e-12, 2), 1e-9));
        let map: HashMap<&str, f64> = [("a", 1.0)].into_iter().collect();
        assert!(map.approx_eq(&map.clone(), 0.0));
    }
}
