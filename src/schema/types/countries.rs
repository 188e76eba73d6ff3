//! Country names and codes.
//!
//! Resolves free-text country names, ISO 3166-1 alpha-2 and alpha-3 codes and
//! a handful of registry-specific aliases to lowercase alpha-2 codes.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::entity::ids::slugify;

/// (alpha-2, alpha-3, English short name)
const COUNTRIES: &[(&str, &str, &str)] = &[
    ("ad", "and", "Andorra"),
    ("ae", "are", "United Arab Emirates"),
    ("af", "afg", "Afghanistan"),
    ("ag", "atg", "Antigua and Barbuda"),
    ("ai", "aia", "Anguilla"),
    ("al", "alb", "Albania"),
    ("am", "arm", "Armenia"),
    ("ao", "ago", "Angola"),
    ("ar", "arg", "Argentina"),
    ("as", "asm", "American Samoa"),
    ("at", "aut", "Austria"),
    ("au", "aus", "Australia"),
    ("aw", "abw", "Aruba"),
    ("az", "aze", "Azerbaijan"),
    ("ba", "bih", "Bosnia and Herzegovina"),
    ("bb", "brb", "Barbados"),
    ("bd", "bgd", "Bangladesh"),
    ("be", "bel", "Belgium"),
    ("bf", "bfa", "Burkina Faso"),
    ("bg", "bgr", "Bulgaria"),
    ("bh", "bhr", "Bahrain"),
    ("bi", "bdi", "Burundi"),
    ("bj", "ben", "Benin"),
    ("bm", "bmu", "Bermuda"),
    ("bn", "brn", "Brunei"),
    ("bo", "bol", "Bolivia"),
    ("bq", "bes", "Bonaire, Sint Eustatius and Saba"),
    ("br", "bra", "Brazil"),
    ("bs", "bhs", "Bahamas"),
    ("bt", "btn", "Bhutan"),
    ("bw", "bwa", "Botswana"),
    ("by", "blr", "Belarus"),
    ("bz", "blz", "Belize"),
    ("ca", "can", "Canada"),
    ("cd", "cod", "Democratic Republic of the Congo"),
    ("cf", "caf", "Central African Republic"),
    ("cg", "cog", "Congo"),
    ("ch", "che", "Switzerland"),
    ("ci", "civ", "Cote d'Ivoire"),
    ("ck", "cok", "Cook Islands"),
    ("cl", "chl", "Chile"),
    ("cm", "cmr", "Cameroon"),
    ("cn", "chn", "China"),
    ("co", "col", "Colombia"),
    ("cr", "cri", "Costa Rica"),
    ("cu", "cub", "Cuba"),
    ("cv", "cpv", "Cabo Verde"),
    ("cw", "cuw", "Curacao"),
    ("cy", "cyp", "Cyprus"),
    ("cz", "cze", "Czech Republic"),
    ("de", "deu", "Germany"),
    ("dj", "dji", "Djibouti"),
    ("dk", "dnk", "Denmark"),
    ("dm", "dma", "Dominica"),
    ("do", "dom", "Dominican Republic"),
    ("dz", "dza", "Algeria"),
    ("ec", "ecu", "Ecuador"),
    ("ee", "est", "Estonia"),
    ("eg", "egy", "Egypt"),
    ("er", "eri", "Eritrea"),
    ("es", "esp", "Spain"),
    ("et", "eth", "Ethiopia"),
    ("fi", "fin", "Finland"),
    ("fj", "fji", "Fiji"),
    ("fk", "flk", "Falkland Islands"),
    ("fm", "fsm", "Micronesia"),
    ("fo", "fro", "Faroe Islands"),
    ("fr", "fra", "France"),
    ("ga", "gab", "Gabon"),
    ("gb", "gbr", "United Kingdom"),
    ("gd", "grd", "Grenada"),
    ("ge", "geo", "Georgia"),
    ("gg", "ggy", "Guernsey"),
    ("gh", "gha", "Ghana"),
    ("gi", "gib", "Gibraltar"),
    ("gl", "grl", "Greenland"),
    ("gm", "gmb", "Gambia"),
    ("gn", "gin", "Guinea"),
    ("gq", "gnq", "Equatorial Guinea"),
    ("gr", "grc", "Greece"),
    ("gt", "gtm", "Guatemala"),
    ("gu", "gum", "Guam"),
    ("gw", "gnb", "Guinea-Bissau"),
    ("gy", "guy", "Guyana"),
    ("hk", "hkg", "Hong Kong"),
    ("hn", "hnd", "Honduras"),
    ("hr", "hrv", "Croatia"),
    ("ht", "hti", "Haiti"),
    ("hu", "hun", "Hungary"),
    ("id", "idn", "Indonesia"),
    ("ie", "irl", "Ireland"),
    ("il", "isr", "Israel"),
    ("im", "imn", "Isle of Man"),
    ("in", "ind", "India"),
    ("iq", "irq", "Iraq"),
    ("ir", "irn", "Iran"),
    ("is", "isl", "Iceland"),
    ("it", "ita", "Italy"),
    ("je", "jey", "Jersey"),
    ("jm", "jam", "Jamaica"),
    ("jo", "jor", "Jordan"),
    ("jp", "jpn", "Japan"),
    ("ke", "ken", "Kenya"),
    ("kg", "kgz", "Kyrgyzstan"),
    ("kh", "khm", "Cambodia"),
    ("ki", "kir", "Kiribati"),
    ("km", "com", "Comoros"),
    ("kn", "kna", "Saint Kitts and Nevis"),
    ("kp", "prk", "North Korea"),
    ("kr", "kor", "South Korea"),
    ("kw", "kwt", "Kuwait"),
    ("ky", "cym", "Cayman Islands"),
    ("kz", "kaz", "Kazakhstan"),
    ("la", "lao", "Laos"),
    ("lb", "lbn", "Lebanon"),
    ("lc", "lca", "Saint Lucia"),
    ("li", "lie", "Liechtenstein"),
    ("lk", "lka", "Sri Lanka"),
    ("lr", "lbr", "Liberia"),
    ("ls", "lso", "Lesotho"),
    ("lt", "ltu", "Lithuania"),
    ("lu", "lux", "Luxembourg"),
    ("lv", "lva", "Latvia"),
    ("ly", "lby", "Libya"),
    ("ma", "mar", "Morocco"),
    ("mc", "mco", "Monaco"),
    ("md", "mda", "Moldova"),
    ("me", "mne", "Montenegro"),
    ("mg", "mdg", "Madagascar"),
    ("mh", "mhl", "Marshall Islands"),
    ("mk", "mkd", "North Macedonia"),
    ("ml", "mli", "Mali"),
    ("mm", "mmr", "Myanmar"),
    ("mn", "mng", "Mongolia"),
    ("mo", "mac", "Macao"),
    ("mp", "mnp", "Northern Mariana Islands"),
    ("mr", "mrt", "Mauritania"),
    ("ms", "msr", "Montserrat"),
    ("mt", "mlt", "Malta"),
    ("mu", "mus", "Mauritius"),
    ("mv", "mdv", "Maldives"),
    ("mw", "mwi", "Malawi"),
    ("mx", "mex", "Mexico"),
    ("my", "mys", "Malaysia"),
    ("mz", "moz", "Mozambique"),
    ("na", "nam", "Namibia"),
    ("nc", "ncl", "New Caledonia"),
    ("ne", "ner", "Niger"),
    ("ng", "nga", "Nigeria"),
    ("ni", "nic", "Nicaragua"),
    ("nl", "nld", "Netherlands"),
    ("no", "nor", "Norway"),
    ("np", "npl", "Nepal"),
    ("nr", "nru", "Nauru"),
    ("nu", "niu", "Niue"),
    ("nz", "nzl", "New Zealand"),
    ("om", "omn", "Oman"),
    ("pa", "pan", "Panama"),
    ("pe", "per", "Peru"),
    ("pf", "pyf", "French Polynesia"),
    ("pg", "png", "Papua New Guinea"),
    ("ph", "phl", "Philippines"),
    ("pk", "pak", "Pakistan"),
    ("pl", "pol", "Poland"),
    ("pr", "pri", "Puerto Rico"),
    ("ps", "pse", "Palestine"),
    ("pt", "prt", "Portugal"),
    ("pw", "plw", "Palau"),
    ("py", "pry", "Paraguay"),
    ("qa", "qat", "Qatar"),
    ("ro", "rou", "Romania"),
    ("rs", "srb", "Serbia"),
    ("ru", "rus", "Russia"),
    ("rw", "rwa", "Rwanda"),
    ("sa", "sau", "Saudi Arabia"),
    ("sb", "slb", "Solomon Islands"),
    ("sc", "syc", "Seychelles"),
    ("sd", "sdn", "Sudan"),
    ("se", "swe", "Sweden"),
    ("sg", "sgp", "Singapore"),
    ("sh", "shn", "Saint Helena"),
    ("si", "svn", "Slovenia"),
    ("sk", "svk", "Slovakia"),
    ("sl", "sle", "Sierra Leone"),
    ("sm", "smr", "San Marino"),
    ("sn", "sen", "Senegal"),
    ("so", "som", "Somalia"),
    ("sr", "sur", "Suriname"),
    ("ss", "ssd", "South Sudan"),
    ("st", "stp", "Sao Tome and Principe"),
    ("sv", "slv", "El Salvador"),
    ("sx", "sxm", "Sint Maarten"),
    ("sy", "syr", "Syria"),
    ("sz", "swz", "Eswatini"),
    ("tc", "tca", "Turks and Caicos Islands"),
    ("td", "tcd", "Chad"),
    ("tg", "tgo", "Togo"),
    ("th", "tha", "Thailand"),
    ("tj", "tjk", "Tajikistan"),
    ("tl", "tls", "Timor-Leste"),
    ("tm", "tkm", "Turkmenistan"),
    ("tn", "tun", "Tunisia"),
    ("to", "ton", "Tonga"),
    ("tr", "tur", "Turkey"),
    ("tt", "tto", "Trinidad and Tobago"),
    ("tv", "tuv", "Tuvalu"),
    ("tw", "twn", "Taiwan"),
    ("tz", "tza", "Tanzania"),
    ("ua", "ukr", "Ukraine"),
    ("ug", "uga", "Uganda"),
    ("us", "usa", "United States"),
    ("uy", "ury", "Uruguay"),
    ("uz", "uzb", "Uzbekistan"),
    ("va", "vat", "Holy See"),
    ("vc", "vct", "Saint Vincent and the Grenadines"),
    ("ve", "ven", "Venezuela"),
    ("vg", "vgb", "British Virgin Islands"),
    ("vi", "vir", "United States Virgin Islands"),
    ("vn", "vnm", "Vietnam"),
    ("vu", "vut", "Vanuatu"),
    ("ws", "wsm", "Samoa"),
    ("xk", "xkx", "Kosovo"),
    ("ye", "yem", "Yemen"),
    ("za", "zaf", "South Africa"),
    ("zm", "zmb", "Zambia"),
    ("zw", "zwe", "Zimbabwe"),
];

/// Alternative spellings seen in registry dumps
const ALIASES: &[(&str, &str)] = &[
    ("uk", "gb"),
    ("great britain", "gb"),
    ("england", "gb"),
    ("wales", "gb"),
    ("scotland", "gb"),
    ("northern ireland", "gb"),
    ("england and wales", "gb"),
    ("united kingdom of great britain and northern ireland", "gb"),
    ("usa", "us"),
    ("united states of america", "us"),
    ("u s a", "us"),
    ("bvi", "vg"),
    ("virgin islands british", "vg"),
    ("british virgin islands bvi", "vg"),
    ("virgin islands u s", "vi"),
    ("hong kong sar", "hk"),
    ("hong kong sar china", "hk"),
    ("macau", "mo"),
    ("russian federation", "ru"),
    ("republic of korea", "kr"),
    ("korea republic of", "kr"),
    ("czechia", "cz"),
    ("the netherlands", "nl"),
    ("holland", "nl"),
    ("the bahamas", "bs"),
    ("bahamas the", "bs"),
    ("ivory coast", "ci"),
    ("cape verde", "cv"),
    ("swaziland", "sz"),
    ("burma", "mm"),
    ("macedonia", "mk"),
    ("moldova republic of", "md"),
    ("republic of moldova", "md"),
    ("iran islamic republic of", "ir"),
    ("viet nam", "vn"),
    ("taiwan province of china", "tw"),
    ("turkiye", "tr"),
    ("lao people s democratic republic", "la"),
    ("syrian arab republic", "sy"),
    ("vatican", "va"),
    ("kosovo", "xk"),
    ("channel islands", "gg"),
    // Nationalities as written in beneficial ownership filings
    ("british", "gb"),
    ("english", "gb"),
    ("scottish", "gb"),
    ("welsh", "gb"),
    ("american", "us"),
    ("irish", "ie"),
    ("german", "de"),
    ("french", "fr"),
    ("italian", "it"),
    ("spanish", "es"),
    ("dutch", "nl"),
    ("polish", "pl"),
    ("russian", "ru"),
    ("chinese", "cn"),
    ("indian", "in"),
    ("cypriot", "cy"),
    ("latvian", "lv"),
    ("estonian", "ee"),
    ("czech", "cz"),
    ("moldovan", "md"),
];

fn normalize(text: &str) -> Option<String> {
    slugify(text).map(|slug| slug.replace('-', " "))
}

fn index() -> &'static HashMap<String, &'static str> {
    static INDEX: OnceLock<HashMap<String, &'static str>> = OnceLock::new();
    INDEX.get_or_init(|| {
        let mut map = HashMap::new();
        for (alpha2, alpha3, name) in COUNTRIES {
            map.insert((*alpha2).to_string(), *alpha2);
            map.insert((*alpha3).to_string(), *alpha2);
            if let Some(key) = normalize(name) {
                map.insert(key, *alpha2);
            }
        }
        for (alias, alpha2) in ALIASES {
            if let Some(key) = normalize(alias) {
                map.insert(key, *alpha2);
            }
        }
        map
    })
}

/// Resolve a country name or code to a lowercase ISO alpha-2 code
#[must_use]
pub fn to_code(text: &str) -> Option<&'static str> {
    let key = normalize(text)?;
    index().get(&key).copied()
}

/// English name for an alpha-2 code
#[must_use]
pub fn country_name(code: &str) -> Option<&'static str> {
    let code = code.trim().to_lowercase();
    COUNTRIES
        .iter()
        .find(|(alpha2, _, _)| *alpha2 == code)
        .map(|(_, _, name)| *name)
}
