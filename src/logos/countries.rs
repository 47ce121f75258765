//! Country name to ISO 3166 flag code lookup.
//!
//! Codes are lowercase, as used by the flag CDNs. The UK home nations use
//! the `gb-xxx` subdivision codes both CDNs understand.

const COUNTRY_CODES: &[(&str, &str)] = &[
    ("Albania", "al"),
    ("Algeria", "dz"),
    ("Andorra", "ad"),
    ("Angola", "ao"),
    ("Argentina", "ar"),
    ("Armenia", "am"),
    ("Australia", "au"),
    ("Austria", "at"),
    ("Azerbaijan", "az"),
    ("Bahrain", "bh"),
    ("Belarus", "by"),
    ("Belgium", "be"),
    ("Bolivia", "bo"),
    ("Bosnia", "ba"),
    ("Bosnia and Herzegovina", "ba"),
    ("Brazil", "br"),
    ("Bulgaria", "bg"),
    ("Burkina Faso", "bf"),
    ("Cameroon", "cm"),
    ("Canada", "ca"),
    ("Chile", "cl"),
    ("China", "cn"),
    ("Colombia", "co"),
    ("Costa Rica", "cr"),
    ("Croatia", "hr"),
    ("Cyprus", "cy"),
    ("Czech Republic", "cz"),
    ("Czechia", "cz"),
    ("Denmark", "dk"),
    ("Ecuador", "ec"),
    ("Egypt", "eg"),
    ("El Salvador", "sv"),
    ("England", "gb-eng"),
    ("Estonia", "ee"),
    ("Faroe Islands", "fo"),
    ("Finland", "fi"),
    ("France", "fr"),
    ("Georgia", "ge"),
    ("Germany", "de"),
    ("Ghana", "gh"),
    ("Gibraltar", "gi"),
    ("Greece", "gr"),
    ("Guatemala", "gt"),
    ("Honduras", "hn"),
    ("Hong Kong", "hk"),
    ("Hungary", "hu"),
    ("Iceland", "is"),
    ("India", "in"),
    ("Indonesia", "id"),
    ("Iran", "ir"),
    ("Iraq", "iq"),
    ("Ireland", "ie"),
    ("Republic of Ireland", "ie"),
    ("Israel", "il"),
    ("Italy", "it"),
    ("Ivory Coast", "ci"),
    ("Cote D'Ivoire", "ci"),
    ("Jamaica", "jm"),
    ("Japan", "jp"),
    ("Jordan", "jo"),
    ("Kazakhstan", "kz"),
    ("Kenya", "ke"),
    ("Kosovo", "xk"),
    ("Kuwait", "kw"),
    ("Latvia", "lv"),
    ("Lebanon", "lb"),
    ("Liechtenstein", "li"),
    ("Lithuania", "lt"),
    ("Luxembourg", "lu"),
    ("Malaysia", "my"),
    ("Mali", "ml"),
    ("Malta", "mt"),
    ("Mexico", "mx"),
    ("Moldova", "md"),
    ("Montenegro", "me"),
    ("Morocco", "ma"),
    ("Netherlands", "nl"),
    ("New Zealand", "nz"),
    ("Nigeria", "ng"),
    ("North Macedonia", "mk"),
    ("Northern Ireland", "gb-nir"),
    ("Norway", "no"),
    ("Oman", "om"),
    ("Panama", "pa"),
    ("Paraguay", "py"),
    ("Peru", "pe"),
    ("Poland", "pl"),
    ("Portugal", "pt"),
    ("Qatar", "qa"),
    ("Romania", "ro"),
    ("Russia", "ru"),
    ("San Marino", "sm"),
    ("Saudi Arabia", "sa"),
    ("Scotland", "gb-sct"),
    ("Senegal", "sn"),
    ("Serbia", "rs"),
    ("Singapore", "sg"),
    ("Slovakia", "sk"),
    ("Slovenia", "si"),
    ("South Africa", "za"),
    ("South Korea", "kr"),
    ("Korea Republic", "kr"),
    ("Spain", "es"),
    ("Sweden", "se"),
    ("Switzerland", "ch"),
    ("Syria", "sy"),
    ("Thailand", "th"),
    ("Tunisia", "tn"),
    ("Turkey", "tr"),
    ("Türkiye", "tr"),
    ("Uganda", "ug"),
    ("Ukraine", "ua"),
    ("United Arab Emirates", "ae"),
    ("UAE", "ae"),
    ("United Kingdom", "gb"),
    ("Uruguay", "uy"),
    ("USA", "us"),
    ("United States", "us"),
    ("Uzbekistan", "uz"),
    ("Venezuela", "ve"),
    ("Vietnam", "vn"),
    ("Wales", "gb-wls"),
    ("Zambia", "zm"),
];

/// ISO code for a country name, case-insensitive. Hyphens and underscores
/// in the input are treated as spaces (`Costa-Rica` matches `Costa Rica`).
pub fn country_code(name: &str) -> Option<&'static str> {
    let normalized = name.trim().replace(['-', '_'], " ");
    if normalized.is_empty() {
        return None;
    }
    COUNTRY_CODES
        .iter()
        .find(|(country, _)| country.eq_ignore_ascii_case(&normalized))
        .map(|(_, code)| *code)
}
