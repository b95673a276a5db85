//! Unit conversions between SI and the display units used in reports.
//! The simulation itself works in SI units only.

/// Unit conversions that should NEVER change
pub const W_PER_HP: f64 = 745.7;
pub const MPS_PER_MPH: f64 = 0.44704;
pub const LB_PER_KG: f64 = 2.20462;
pub const M_PER_IN: f64 = 0.0254;
pub const M2_PER_IN2: f64 = 0.00064516;
pub const FT_PER_M: f64 = 3.28084;
pub const NM_PER_LBFT: f64 = 1.35582;
/// Standard gravity used to express acceleration in g
pub const MPS2_PER_G: f64 = 9.81;

pub fn hp_to_watt(hp: f64) -> f64 {
    hp * W_PER_HP
}

pub fn watt_to_hp(watt: f64) -> f64 {
    watt / W_PER_HP
}

pub fn mph_to_mps(mph: f64) -> f64 {
    mph * MPS_PER_MPH
}

pub fn mps_to_mph(mps: f64) -> f64 {
    mps / MPS_PER_MPH
}

pub fn kg_to_lb(kg: f64) -> f64 {
    kg * LB_PER_KG
}

pub fn lb_to_kg(lb: f64) -> f64 {
    lb / LB_PER_KG
}

pub fn in_to_m(inch: f64) -> f64 {
    inch * M_PER_IN
}

pub fn sq_in_to_m2(sq_in: f64) -> f64 {
    sq_in * M2_PER_IN2
}

pub fn m_to_ft(m: f64) -> f64 {
    m * FT_PER_M
}

pub fn mps2_to_g(mps2: f64) -> f64 {
    mps2 / MPS2_PER_G
}

pub fn g_to_mps2(g: f64) -> f64 {
    g * MPS2_PER_G
}

pub fn lbft_to_nm(lbft: f64) -> f64 {
    lbft * NM_PER_LBFT
}

pub fn nm_to_lbft(nm: f64) -> f64 {
    nm / NM_PER_LBFT
}
