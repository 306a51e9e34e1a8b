/// Kenya's 47 counties, sorted for binary search.
pub const KENYAN_COUNTIES: [&str; 47] = [
    "Baringo",
    "Bomet",
    "Bungoma",
    "Busia",
    "Elgeyo-Marakwet",
    "Embu",
    "Garissa",
    "Homa Bay",
    "Isiolo",
    "Kajiado",
    "Kakamega",
    "Kericho",
    "Kiambu",
    "Kilifi",
    "Kirinyaga",
    "Kisii",
    "Kisumu",
    "Kitui",
    "Kwale",
    "Laikipia",
    "Lamu",
    "Machakos",
    "Makueni",
    "Mandera",
    "Marsabit",
    "Meru",
    "Migori",
    "Mombasa",
    "Murang'a",
    "Nairobi",
    "Nakuru",
    "Nandi",
    "Narok",
    "Nyamira",
    "Nyandarua",
    "Nyeri",
    "Samburu",
    "Siaya",
    "Taita-Taveta",
    "Tana River",
    "Tharaka-Nithi",
    "Trans-Nzoia",
    "Turkana",
    "Uasin Gishu",
    "Vihiga",
    "Wajir",
    "West Pokot",
];

/// Canonical spelling of a county name, matched case-insensitively.
pub fn canonical_county(name: &str) -> Option<&'static str> {
    let name = name.trim();
    if let Ok(idx) = KENYAN_COUNTIES.binary_search(&name) {
        return Some(KENYAN_COUNTIES[idx]);
    }
    KENYAN_COUNTIES
        .iter()
        .copied()
        .find(|c| c.eq_ignore_ascii_case(name))
}

pub fn is_kenyan_county(name: &str) -> bool {
    canonical_county(name).is_some()
}
