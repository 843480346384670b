use crate::error::Error;

/// Shape of the generated token. Every variant except `Raw` maps to a list
/// of templates; the site key picks one template and then one character per
/// template position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordType {
    Maximum,
    Long,
    Medium,
    Basic,
    Short,
    Pin,
    Name,
    Phrase,
    #[cfg(feature = "extensions")]
    PinSix,
    #[cfg(feature = "extensions")]
    Vast,
    #[cfg(feature = "extensions")]
    BigPhrase,
    /// The 32 site-key bytes themselves, unformatted.
    Raw,
}

const MAXIMUM: &[&[u8]] = &[b"anoxxxxxxxxxxxxxxxxx", b"axxxxxxxxxxxxxxxxxno"];

const LONG: &[&[u8]] = &[
    b"CvcvnoCvcvCvcv",
    b"CvcvCvcvnoCvcv",
    b"CvcvCvcvCvcvno",
    b"CvccnoCvcvCvcv",
    b"CvccCvcvnoCvcv",
    b"CvccCvcvCvcvno",
    b"CvcvnoCvccCvcv",
    b"CvcvCvccnoCvcv",
    b"CvcvCvccCvcvno",
    b"CvcvnoCvcvCvcc",
    b"CvcvCvcvnoCvcc",
    b"CvcvCvcvCvccno",
    b"CvccnoCvccCvcv",
    b"CvccCvccnoCvcv",
    b"CvccCvccCvcvno",
    b"CvcvnoCvccCvcc",
    b"CvcvCvccnoCvcc",
    b"CvcvCvccCvccno",
    b"CvccnoCvcvCvcc",
    b"CvccCvcvnoCvcc",
    b"CvccCvcvCvccno",
];

const MEDIUM: &[&[u8]] = &[b"CvcnoCvc", b"CvcCvcno"];

const BASIC: &[&[u8]] = &[b"aaanaaan", b"aannaaan", b"aaannaaa"];

const SHORT: &[&[u8]] = &[b"Cvcn"];

const PIN: &[&[u8]] = &[b"nnnn"];

const NAME: &[&[u8]] = &[b"cvccvcvcv"];

const PHRASE: &[&[u8]] = &[
    b"cvcc cvc cvccvcv cvc",
    b"cvc cvccvcvcv cvcv",
    b"cv cvccv cvc cvcvccv",
];

#[cfg(feature = "extensions")]
const PIN_SIX: &[&[u8]] = &[b"nnnnnn"];

#[cfg(feature = "extensions")]
const VAST: &[&[u8]] = &[
    b"anoxxxxxxxxxxxxxxxxxxxxxxxxxxx",
    b"axxxxxxxxxxxxxxxxxxxxxxxxxxxno",
];

#[cfg(feature = "extensions")]
const BIG_PHRASE: &[&[u8]] = &[
    b"cvcc cvc cvccvcv cvc cvccvcv cvcc",
    b"cvcc cvcc cvc cvccvcvcv cvcv cvcc",
    b"cv cvccv cvc cvcvccv cvccvcvcv cvc cvc",
];

impl PasswordType {
    /// `None` for `Raw`, which bypasses templating entirely.
    pub(crate) const fn templates(self) -> Option<&'static [&'static [u8]]> {
        match self {
            Self::Maximum => Some(MAXIMUM),
            Self::Long => Some(LONG),
            Self::Medium => Some(MEDIUM),
            Self::Basic => Some(BASIC),
            Self::Short => Some(SHORT),
            Self::Pin => Some(PIN),
            Self::Name => Some(NAME),
            Self::Phrase => Some(PHRASE),
            #[cfg(feature = "extensions")]
            Self::PinSix => Some(PIN_SIX),
            #[cfg(feature = "extensions")]
            Self::Vast => Some(VAST),
            #[cfg(feature = "extensions")]
            Self::BigPhrase => Some(BIG_PHRASE),
            Self::Raw => None,
        }
    }
}

/// Candidate characters for one template position.
pub(crate) const fn class_characters(class: u8) -> Result<&'static [u8], Error> {
    match class {
        b'V' => Ok(b"AEIOU"),
        b'C' => Ok(b"BCDFGHJKLMNPQRSTVWXYZ"),
        b'v' => Ok(b"aeiou"),
        b'c' => Ok(b"bcdfghjklmnpqrstvwxyz"),
        b'A' => Ok(b"AEIOUBCDFGHJKLMNPQRSTVWXYZ"),
        b'a' => Ok(b"AEIOUaeiouBCDFGHJKLMNPQRSTVWXYZbcdfghjklmnpqrstvwxyz"),
        b'n' => Ok(b"0123456789"),
        b'o' => Ok(b"@&%?,=[]_:-+*$#!'^~;()/."),
        b'x' => Ok(b"AEIOUaeiouBCDFGHJKLMNPQRSTVWXYZbcdfghjklmnpqrstvwxyz0123456789!@#$%^&*()"),
        b' ' => Ok(b" "),
        _ => Err(Error::UnknownTemplateClass(class as char)),
    }
}
