use crate::error::Error;
use mpw::PasswordType;

#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TomlConfig {
    table: toml::value::Table,
}

impl TomlConfig {
    pub const fn new(table: toml::value::Table) -> Self {
        Self { table }
    }

    pub fn empty() -> Self {
        Self {
            table: toml::value::Table::new(),
        }
    }

    /// Default identity when `--user` is not given.
    pub fn user(&self) -> Option<String> {
        if let Some(toml::Value::String(v)) = self.table.get("user") {
            Some(v.clone())
        } else {
            None
        }
    }

    /// Default password type when `--kind` is not given.
    pub fn default_kind(&self) -> Result<Option<PasswordType>, Error> {
        if let Some(toml::Value::String(v)) = self.table.get("default_kind") {
            parse_kind(v).map(Some)
        } else {
            Ok(None)
        }
    }
}

pub fn parse_kind(s: &str) -> Result<PasswordType, Error> {
    match s {
        "maximum" | "max" => Ok(PasswordType::Maximum),
        "long" => Ok(PasswordType::Long),
        "medium" => Ok(PasswordType::Medium),
        "basic" => Ok(PasswordType::Basic),
        "short" => Ok(PasswordType::Short),
        "pin" => Ok(PasswordType::Pin),
        "name" => Ok(PasswordType::Name),
        "phrase" => Ok(PasswordType::Phrase),
        #[cfg(feature = "extensions")]
        "pin6" => Ok(PasswordType::PinSix),
        #[cfg(feature = "extensions")]
        "vast" => Ok(PasswordType::Vast),
        #[cfg(feature = "extensions")]
        "bigphrase" => Ok(PasswordType::BigPhrase),
        "raw" => Ok(PasswordType::Raw),
        _ => Err(Error::InvalidField("kind")),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn kinds_parse() {
        assert_eq!(parse_kind("long").unwrap(), PasswordType::Long);
        assert_eq!(parse_kind("max").unwrap(), PasswordType::Maximum);
        assert!(parse_kind("gibberish").is_err());
    }

    #[test]
    fn config_fields_are_optional() {
        let config = TomlConfig::empty();
        assert!(config.user().is_none());
        assert!(config.default_kind().unwrap().is_none());

        let table = toml::from_str::<toml::value::Table>(
            "user = \"Robert Lee Mitchell\"\ndefault_kind = \"phrase\"\n",
        )
        .unwrap();
        let config = TomlConfig::new(table);
        assert_eq!(config.user().as_deref(), Some("Robert Lee Mitchell"));
        assert_eq!(config.default_kind().unwrap(), Some(PasswordType::Phrase));
    }
}
