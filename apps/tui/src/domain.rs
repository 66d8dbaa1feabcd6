use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::Deserialize;

/// Priority of an alert as reported by the analysis service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlertLevel {
    High,
    #[default]
    Normal,
}

impl AlertLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Normal => "NORMAL",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High Priority",
            Self::Normal => "Normal",
        }
    }

    pub const fn is_high(self) -> bool {
        matches!(self, Self::High)
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "HIGH" => Some(Self::High),
            "NORMAL" => Some(Self::Normal),
            _ => None,
        }
    }
}

// On the wire the level is a plain string; anything that is not
// exactly HIGH renders as a normal alert, matching the service.
impl<'de> Deserialize<'de> for AlertLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw).unwrap_or_default())
    }
}

impl serde::Serialize for AlertLevel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}
