// In: src/wavelet/family.rs

//! Named wavelet families and their four filters.
//!
//! Supported names:
//! * `haar`, `db1` .. `db10` (Daubechies)
//! * `coif1` .. `coif5` (Coiflets)
//! * `bior1.1`, `bior1.3`, `bior1.5`, `bior2.2`, `bior2.4`, `bior2.6`, `bior2.8`,
//!   `bior3.1`, `bior3.3`, `bior3.5`, `bior3.7`, `bior3.9`, `bior4.4` (biorthogonal spline)
//! * `intbior2.2`, alias `intcdf5/3` (integer CDF 5/3 lifting)
//!
//! Every family is built from a scaling filter `h` and a mirror filter `g`:
//! `lo_d = reverse(h)`, `hi_d = reverse(qmf(g))`, `lo_r = g'`, `hi_r = qmf(h')`
//! where the biorthogonal families swap the roles of the two tables between analysis
//! and synthesis.

use std::f64::consts::{FRAC_1_SQRT_2, SQRT_2};

use crate::error::WavepackError;
use crate::wavelet::mode::BoundaryMode;

//==================================================================================
// 1. Filter Tables
//==================================================================================

const DB1: [f64; 2] = [FRAC_1_SQRT_2, FRAC_1_SQRT_2];

const DB2: [f64; 4] = [
    0.48296291314453414337487159986, 0.83651630373780790557529378092, 0.22414386804201338102597276224,
    -0.12940952255126038117444941881,
];

const DB3: [f64; 6] = [
    0.33267055295008261599851158914, 0.80689150931109257649449360409, 0.45987750211849157009515194215,
    -0.13501102001025458869638990670, -0.08544127388202666169281916918, 0.03522629188570953660274066472,
];

const DB4: [f64; 8] = [
    0.23037781330889650086329118304, 0.71484657055291564708992195527, 0.63088076792985890788171633830,
    -0.02798376941685985421141374718, -0.18703481171909308407957067279, 0.03084138183556076362721936253,
    0.03288301166688519973540751355, -0.01059740178506903210488320852,
];

const DB5: [f64; 10] = [
    0.16010239797419291448072374802, 0.60382926979718967054011930653, 0.72430852843777292772807124410,
    0.13842814590132073150539714634, -0.24229488706638203186257137947, -0.03224486958463837464847975506,
    0.07757149384004571352313048939, -0.00624149021279827427419051911, -0.01258075199908199946850973993,
    0.00333572528547377127799818342,
];

const DB6: [f64; 12] = [
    0.11154074335010946362132391724, 0.49462389039845308567720417688, 0.75113390802109535067893449844,
    0.31525035170919762908598965481, -0.22626469396543982007631450066, -0.12976686756726193556228960588,
    0.09750160558732304910234355254, 0.02752286553030572862554083950, -0.03158203931748602956507908070,
    0.00055384220116149613925191840, 0.00477725751094551063963597525, -0.00107730108530847956485262161,
];

const DB7: [f64; 14] = [
    0.07785205408500917901996352196, 0.39653931948191730653900039094, 0.72913209084623511991694307034,
    0.46978228740519312247159116097, -0.14390600392856497540506836221, -0.22403618499387498263814042023,
    0.07130921926683026475087657050, 0.08061260915108307191292248036, -0.03802993693501441357959206160,
    -0.01657454163066688065410767489, 0.01255099855609984061298988603, 0.00042957797292136652113212912,
    -0.00180164070404749091526826291, 0.00035371379997452024844629584,
];

const DB8: [f64; 16] = [
    0.05441584224310400995500940520, 0.31287159091429997065916237551, 0.67563073629728980680780076705,
    0.58535468365420671277126552005, -0.01582910525634930566738054788, -0.28401554296154692651620313237,
    0.00047248457391328277036059001, 0.12874742662047845885702928751, -0.01736930100180754616961614887,
    -0.04408825393079475150676372324, 0.01398102791739828164872293057, 0.00874609404740577671638274325,
    -0.00487035299345157431042218156, -0.00039174037337694704629808036, 0.00067544940645056936636954757,
    -0.00011747678412476953373062823,
];

const DB9: [f64; 18] = [
    0.03807794736387834658869765888, 0.24383467461259035373204158165, 0.60482312369011111190307686743,
    0.65728807805130053807821263905, 0.13319738582500757619095494590, -0.29327378327917490880640319524,
    -0.09684078322297646051350813354, 0.14854074933810638013507271751, 0.03072568147933337921231740072,
    -0.06763282906132997367564227483, 0.00025094711483145195758718975, 0.02236166212367909720537378270,
    -0.00472320475775139727792570785, -0.00428150368246342983449679500, 0.00184764688305622647661912949,
    0.00023038576352319596720521639, -0.00025196318894271013697498868, 0.00003934732031627159948068988,
];

const DB10: [f64; 20] = [
    0.02667005790055555358661744877, 0.18817680007769148902089297368, 0.52720118893172558648174482796,
    0.68845903945360356574187178255, 0.28117234366057746074872699845, -0.24984642432731537941610189792,
    -0.19594627437737704350429925432, 0.12736934033579326008267723320, 0.09305736460357235116035228984,
    -0.07139414716639708714533609308, -0.02945753682187581285828323760, 0.03321267405934100173976365318,
    0.00360655356695616965542329142, -0.01073317548333057504431811411, 0.00139535174705290116578931845,
    0.00199240529518505611715874224, -0.00068585669495971162656137098, -0.00011646685512928545095148097,
    0.00009358867032006959133405013, -0.00001326420289452124481243668,
];

const COIF1: [f64; 6] = [
    -0.051429728471000, 0.238929728471000, 0.602859456942000,
    0.272140543058000, -0.051429728471000, -0.011070271529000,
];

const COIF2: [f64; 12] = [
    0.011587596739000, -0.029320137980000, -0.047639590310000,
    0.273021046535000, 0.574682393857000, 0.294867193696000,
    -0.054085607092000, -0.042026480461000, 0.016744410163000,
    0.003967883613000, -0.001289203356000, -0.000509505399000,
];

const COIF3: [f64; 18] = [
    -0.002682418671000, 0.005503126709000, 0.016583560479000,
    -0.046507764479000, -0.043220763560000, 0.286503335274000,
    0.561285256870000, 0.302983571773000, -0.050770140755000,
    -0.058196250762000, 0.024434094321000, 0.011229240962000,
    -0.006369601011000, -0.001820458916000, 0.000790205101000,
    0.000329665174000, -0.000050192775000, -0.000024465734000,
];

const COIF4: [f64; 24] = [
    0.000630961046000, -0.001152224852000, -0.005194524026000,
    0.011362459244000, 0.018867235378000, -0.057464234429000,
    -0.039652648517000, 0.293667390895000, 0.553126452562000,
    0.307157326198000, -0.047112738865000, -0.068038127051000,
    0.027813640153000, 0.017735837438000, -0.010756318517000,
    -0.004001012886000, 0.002652665946000, 0.000895594529000,
    -0.000416500571000, -0.000183829769000, 0.000044080354000,
    0.000022082857000, -0.000002304942000, -0.000001262175000,
];

const COIF5: [f64; 30] = [
    -0.000149963800000, 0.000253561200000, 0.001540245700000,
    -0.002941110800000, -0.007163781900000, 0.016552066400000,
    0.019917804300000, -0.064997262800000, -0.036800073600000,
    0.298092323500000, 0.547505429400000, 0.309706849000000,
    -0.043866050800000, -0.074652238900000, 0.029195879500000,
    0.023110777000000, -0.013973687900000, -0.006480090000000,
    0.004783001400000, 0.001720654700000, -0.001175822200000,
    -0.000451227000000, 0.000213729800000, 0.000099377600000,
    -0.000029232100000, -0.000015072000000, 0.000002640800000,
    0.000001459300000, -0.000000118400000, -0.000000067300000,
];

const H1: [f64; 10] = [
    0.0, 0.0, 0.0,
    0.0, 0.70710678118654752440084436210, 0.70710678118654752440084436210,
    0.0, 0.0, 0.0,
    0.0,
];

const HM1_11: [f64; 2] = [
    0.70710678118654752440084436210, 0.70710678118654752440084436210,
];

const HM1_13: [f64; 6] = [
    -0.0883883476483184405501055452631, 0.0883883476483184405501055452631, 0.70710678118654752440084436210,
    0.70710678118654752440084436210, 0.0883883476483184405501055452631, -0.0883883476483184405501055452631,
];

const HM1_15: [f64; 10] = [
    0.0165728151840597076031447897368, -0.0165728151840597076031447897368, -0.1215339780164378557563951247368,
    0.1215339780164378557563951247368, 0.70710678118654752440084436210, 0.70710678118654752440084436210,
    0.1215339780164378557563951247368, -0.1215339780164378557563951247368, -0.0165728151840597076031447897368,
    0.0165728151840597076031447897368,
];

const H2: [f64; 18] = [
    0.0, 0.0, 0.0,
    0.0, 0.0, 0.0,
    0.0, 0.3535533905932737622004221810524, 0.7071067811865475244008443621048,
    0.3535533905932737622004221810524, 0.0, 0.0,
    0.0, 0.0, 0.0,
    0.0, 0.0, 0.0,
];

const HM2_22: [f64; 5] = [
    -0.1767766952966368811002110905262, 0.3535533905932737622004221810524, 1.0606601717798212866012665431573,
    0.3535533905932737622004221810524, -0.1767766952966368811002110905262,
];

const HM2_24: [f64; 9] = [
    0.0331456303681194152062895794737, -0.0662912607362388304125791589473, -0.1767766952966368811002110905262,
    0.4198446513295125926130013399998, 0.9943689110435824561886873842099, 0.4198446513295125926130013399998,
    -0.1767766952966368811002110905262, -0.0662912607362388304125791589473, 0.0331456303681194152062895794737,
];

const HM2_26: [f64; 13] = [
    -0.0069053396600248781679769957237, 0.0138106793200497563359539914474, 0.0469563096881691715422435709210,
    -0.1077232986963880994204411332894, -0.1698713556366120029322340948025, 0.4474660099696121052849093228945,
    0.9667475524034829435167794013152, 0.4474660099696121052849093228945, -0.1698713556366120029322340948025,
    -0.1077232986963880994204411332894, 0.0469563096881691715422435709210, 0.0138106793200497563359539914474,
    -0.0069053396600248781679769957237,
];

const HM2_28: [f64; 17] = [
    0.0015105430506304420992449678146, -0.0030210861012608841984899356291, -0.0129475118625466465649568669819,
    0.0289161098263541773284036695929, 0.0529984818906909399392234421792, -0.1349130736077360572068505539514,
    -0.1638291834340902345352542235443, 0.4625714404759165262773590010400, 0.9516421218971785225243297231697,
    0.4625714404759165262773590010400, -0.1638291834340902345352542235443, -0.1349130736077360572068505539514,
    0.0529984818906909399392234421792, 0.0289161098263541773284036695929, -0.0129475118625466465649568669819,
    -0.0030210861012608841984899356291, 0.0015105430506304420992449678146,
];

const H3: [f64; 20] = [
    0.0, 0.0, 0.0,
    0.0, 0.0, 0.0,
    0.0, 0.0, 0.1767766952966368811002110905262,
    0.5303300858899106433006332715786, 0.5303300858899106433006332715786, 0.1767766952966368811002110905262,
    0.0, 0.0, 0.0,
    0.0, 0.0, 0.0,
    0.0, 0.0,
];

const HM3_31: [f64; 4] = [
    -0.3535533905932737622004221810524, 1.0606601717798212866012665431573, 1.0606601717798212866012665431573,
    -0.3535533905932737622004221810524,
];

const HM3_33: [f64; 8] = [
    0.0662912607362388304125791589473, -0.1988737822087164912377374768420, -0.1546796083845572709626847042104,
    0.9943689110435824561886873842099, 0.9943689110435824561886873842099, -0.1546796083845572709626847042104,
    -0.1988737822087164912377374768420, 0.0662912607362388304125791589473,
];

const HM3_35: [f64; 12] = [
    -0.0138106793200497563359539914474, 0.0414320379601492690078619743421, 0.0524805814161890740766251675000,
    -0.2679271788089652729175074340788, -0.0718155324642587329469607555263, 0.9667475524034829435167794013152,
    0.9667475524034829435167794013152, -0.0718155324642587329469607555263, -0.2679271788089652729175074340788,
    0.0524805814161890740766251675000, 0.0414320379601492690078619743421, -0.0138106793200497563359539914474,
];

const HM3_37: [f64; 16] = [
    0.0030210861012608841984899356291, -0.0090632583037826525954698068873, -0.0168317654213106405344439270765,
    0.0746639850740189951912512662623, 0.0313329787073628846871956180962, -0.3011591259228349991008967259990,
    -0.0264992409453454699696117210896, 0.9516421218971785225243297231697, 0.9516421218971785225243297231697,
    -0.0264992409453454699696117210896, -0.3011591259228349991008967259990, 0.0313329787073628846871956180962,
    0.0746639850740189951912512662623, -0.0168317654213106405344439270765, -0.0090632583037826525954698068873,
    0.0030210861012608841984899356291,
];

const HM3_39: [f64; 20] = [
    -0.0006797443727836989446602355165, 0.0020392331183510968339807065496, 0.0050603192196119810324706421788,
    -0.0206189126411055346546938106687, -0.0141127879301758447558029850103, 0.0991347824942321571990197448581,
    0.0123001362694193142367090236328, -0.3201919683607785695513833204624, 0.0020500227115698857061181706055,
    0.9421257006782067372990864259380, 0.9421257006782067372990864259380, 0.0020500227115698857061181706055,
    -0.3201919683607785695513833204624, 0.0123001362694193142367090236328, 0.0991347824942321571990197448581,
    -0.0141127879301758447558029850103, -0.0206189126411055346546938106687, 0.0050603192196119810324706421788,
    0.0020392331183510968339807065496, -0.0006797443727836989446602355165,
];

const HM4_44: [f64; 9] = [
    0.037828455507264, -0.023849465019557, -0.110624404418437,
    0.377402855612831, 0.852698679008894, 0.377402855612831,
    -0.110624404418437, -0.023849465019557, 0.037828455507264,
];

const H4: [f64; 9] = [
    0.0, -0.064538882628697, -0.040689417609164,
    0.418092273221617, 0.788485616405583, 0.418092273221617,
    -0.0406894176091641, -0.0645388826286971, 0.0,
];

// CDF 5/3 nominal taps. The lifting kernels do not read them.
const INT_H22: [f64; 5] = [-0.125, 0.25, 0.75, 0.25, -0.125];
const INT_HM22: [f64; 5] = [0.0, -0.5, 1.0, -0.5, 0.0];

//==================================================================================
// 2. Filter Construction Helpers
//==================================================================================

fn wrev(x: &[f64]) -> Vec<f64> {
    x.iter().rev().copied().collect()
}

/// Quadrature mirror: reverse, then negate every odd position.
fn qmf_even(x: &[f64]) -> Vec<f64> {
    x.iter()
        .rev()
        .enumerate()
        .map(|(i, &v)| if i % 2 == 1 { -v } else { v })
        .collect()
}

fn qmf_wrev(x: &[f64]) -> Vec<f64> {
    wrev(&qmf_even(x))
}

/// Which construction a family uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FamilyKind {
    Orthogonal,
    Biorthogonal,
    Lifting,
}

//==================================================================================
// 3. WaveletFilter
//==================================================================================

/// The analysis and synthesis filters of one named wavelet.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveletFilter {
    name: String,
    kind: FamilyKind,
    lo_d: Vec<f64>,
    hi_d: Vec<f64>,
    lo_r: Vec<f64>,
    hi_r: Vec<f64>,
    default_mode: BoundaryMode,
}

impl WaveletFilter {
    /// Looks up a wavelet by name.
    pub fn from_name(name: &str) -> Result<Self, WavepackError> {
        let unknown = || WavepackError::UnknownWavelet(name.to_string());

        if name == "haar" {
            return Ok(Self::orthogonal(name, &DB1));
        }
        if let Some(member) = name.strip_prefix("db") {
            let h: &[f64] = match member {
                "1" => &DB1,
                "2" => &DB2,
                "3" => &DB3,
                "4" => &DB4,
                "5" => &DB5,
                "6" => &DB6,
                "7" => &DB7,
                "8" => &DB8,
                "9" => &DB9,
                "10" => &DB10,
                _ => return Err(unknown()),
            };
            return Ok(Self::orthogonal(name, h));
        }
        if let Some(member) = name.strip_prefix("coif") {
            let h: &[f64] = match member {
                "1" => &COIF1,
                "2" => &COIF2,
                "3" => &COIF3,
                "4" => &COIF4,
                "5" => &COIF5,
                _ => return Err(unknown()),
            };
            // Coiflet tables are normalised to unit sum.
            let scaled: Vec<f64> = h.iter().map(|v| v * SQRT_2).collect();
            return Ok(Self::orthogonal(name, &scaled));
        }
        if let Some(member) = name.strip_prefix("bior") {
            // (primal table, mirror table) as stored; both truncated to the filter length.
            let (primal, mirror): (&[f64], &[f64]) = match member {
                "1.1" => (&HM1_11, &H1[4..6]),
                "1.3" => (&HM1_13, &H1[2..8]),
                "1.5" => (&HM1_15, &H1[..]),
                "2.2" => (&HM2_22, &H2[6..11]),
                "2.4" => (&HM2_24, &H2[4..13]),
                "2.6" => (&HM2_26, &H2[2..15]),
                "2.8" => (&HM2_28, &H2[..17]),
                "3.1" => (&HM3_31, &H3[8..12]),
                "3.3" => (&HM3_33, &H3[6..14]),
                "3.5" => (&HM3_35, &H3[4..16]),
                "3.7" => (&HM3_37, &H3[2..18]),
                "3.9" => (&HM3_39, &H3[..]),
                "4.4" => (&HM4_44, &H4[..]),
                _ => return Err(unknown()),
            };
            let default_mode = match member.as_bytes()[0] {
                b'1' | b'3' => BoundaryMode::Symh,
                _ => BoundaryMode::Symw,
            };
            return Ok(Self::biorthogonal(
                name,
                primal,
                mirror,
                FamilyKind::Biorthogonal,
                default_mode,
            ));
        }
        if name == "intbior2.2" || name == "intcdf5/3" {
            return Ok(Self::biorthogonal(
                name,
                &INT_H22,
                &INT_HM22,
                FamilyKind::Lifting,
                BoundaryMode::Symw,
            ));
        }
        Err(unknown())
    }

    fn orthogonal(name: &str, h: &[f64]) -> Self {
        Self {
            name: name.to_string(),
            kind: FamilyKind::Orthogonal,
            lo_d: wrev(h),
            hi_d: qmf_wrev(h),
            lo_r: h.to_vec(),
            hi_r: qmf_even(h),
            default_mode: BoundaryMode::Sp0,
        }
    }

    fn biorthogonal(
        name: &str,
        primal: &[f64],
        mirror: &[f64],
        kind: FamilyKind,
        default_mode: BoundaryMode,
    ) -> Self {
        Self {
            name: name.to_string(),
            kind,
            lo_d: wrev(primal),
            hi_d: qmf_wrev(mirror),
            lo_r: mirror.to_vec(),
            hi_r: qmf_even(primal),
            default_mode,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FamilyKind {
        self.kind
    }

    pub fn filter_len(&self) -> usize {
        self.lo_d.len()
    }

    /// Biorthogonal and lifting filters are symmetric; orthogonal ones are not.
    pub fn is_symmetric(&self) -> bool {
        self.kind != FamilyKind::Orthogonal
    }

    pub fn is_lifting(&self) -> bool {
        self.kind == FamilyKind::Lifting
    }

    pub fn default_mode(&self) -> BoundaryMode {
        self.default_mode
    }

    pub fn lo_d(&self) -> &[f64] {
        &self.lo_d
    }

    pub fn hi_d(&self) -> &[f64] {
        &self.hi_d
    }

    pub fn lo_r(&self) -> &[f64] {
        &self.lo_r
    }

    pub fn hi_r(&self) -> &[f64] {
        &self.hi_r
    }

    /// Whether `mode` can be inverted exactly with this filter.
    pub fn supports_mode(&self, mode: BoundaryMode) -> bool {
        if self.is_lifting() {
            return mode == BoundaryMode::Symw;
        }
        if self.filter_len() % 2 == 1 {
            return matches!(mode, BoundaryMode::Symw | BoundaryMode::Per);
        }
        true
    }
}

/// Every name `WaveletFilter::from_name` accepts.
pub const WAVELET_NAMES: [&str; 31] = [
    "haar", "db1", "db2", "db3", "db4", "db5", "db6", "db7", "db8", "db9", "db10", "coif1",
    "coif2", "coif3", "coif4", "coif5", "bior1.1", "bior1.3", "bior1.5", "bior2.2", "bior2.4",
    "bior2.6", "bior2.8", "bior3.1", "bior3.3", "bior3.5", "bior3.7", "bior3.9", "bior4.4",
    "intbior2.2", "intcdf5/3",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_names_resolve() {
        for name in WAVELET_NAMES {
            let w = WaveletFilter::from_name(name).unwrap();
            assert_eq!(w.name(), name);
            assert_eq!(w.lo_d().len(), w.filter_len());
            assert_eq!(w.hi_r().len(), w.filter_len());
        }
        assert!(matches!(
            WaveletFilter::from_name("db11"),
            Err(WavepackError::UnknownWavelet(_))
        ));
        assert!(WaveletFilter::from_name("bior5.5").is_err());
        assert!(WaveletFilter::from_name("sym4").is_err());
    }

    #[test]
    fn test_filter_lengths() {
        let len = |n: &str| WaveletFilter::from_name(n).unwrap().filter_len();
        assert_eq!(len("haar"), 2);
        assert_eq!(len("db10"), 20);
        assert_eq!(len("coif5"), 30);
        assert_eq!(len("bior1.5"), 10);
        assert_eq!(len("bior2.2"), 5);
        assert_eq!(len("bior3.9"), 20);
        assert_eq!(len("bior4.4"), 9);
        assert_eq!(len("intbior2.2"), 5);
    }

    #[test]
    fn test_orthogonal_lowpass_sums_to_sqrt2() {
        for name in ["haar", "db4", "db10", "coif1", "coif5"] {
            let w = WaveletFilter::from_name(name).unwrap();
            let sum: f64 = w.lo_r().iter().sum();
            assert!((sum - SQRT_2).abs() < 1e-6, "{name}: {sum}");
            let hi_sum: f64 = w.hi_d().iter().sum();
            assert!(hi_sum.abs() < 1e-6, "{name}: {hi_sum}");
        }
    }

    #[test]
    fn test_haar_taps() {
        let w = WaveletFilter::from_name("haar").unwrap();
        assert_eq!(w.lo_d(), &[FRAC_1_SQRT_2, FRAC_1_SQRT_2]);
        assert_eq!(w.hi_d(), &[-FRAC_1_SQRT_2, FRAC_1_SQRT_2]);
        assert_eq!(w.hi_r(), &[FRAC_1_SQRT_2, -FRAC_1_SQRT_2]);
        assert!(!w.is_symmetric());
    }

    #[test]
    fn test_default_modes_and_pairings() {
        let w = |n: &str| WaveletFilter::from_name(n).unwrap();
        assert_eq!(w("bior1.3").default_mode(), BoundaryMode::Symh);
        assert_eq!(w("bior3.7").default_mode(), BoundaryMode::Symh);
        assert_eq!(w("bior2.4").default_mode(), BoundaryMode::Symw);
        assert_eq!(w("bior4.4").default_mode(), BoundaryMode::Symw);
        assert_eq!(w("intcdf5/3").default_mode(), BoundaryMode::Symw);
        assert_eq!(w("db3").default_mode(), BoundaryMode::Sp0);

        assert!(w("bior4.4").supports_mode(BoundaryMode::Per));
        assert!(!w("bior4.4").supports_mode(BoundaryMode::Symh));
        assert!(w("db2").supports_mode(BoundaryMode::Zpd));
        assert!(!w("intbior2.2").supports_mode(BoundaryMode::Per));
        assert!(w("bior3.3").is_symmetric());
    }
}
