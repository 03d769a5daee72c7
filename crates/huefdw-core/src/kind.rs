// ── Resource kinds and row serialization modes ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// One of the four bridge collections exposed as a table.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ResourceKind {
    Lights,
    Sensors,
    Scenes,
    Config,
}

impl ResourceKind {
    /// Path segment under `/api/{token}/`.
    pub fn path_segment(self) -> &'static str {
        self.into()
    }

    /// The column that identifies a row for updates.
    pub fn row_id_column(self) -> &'static str {
        match self {
            Self::Lights => "light_id",
            Self::Sensors => "sensor_id",
            Self::Scenes => "scene_id",
            Self::Config => "name",
        }
    }

    /// `config` is a single object, not a collection keyed by id.
    pub fn is_singleton(self) -> bool {
        matches!(self, Self::Config)
    }

    /// Object the mutation endpoint writes into, relative to the entry.
    ///
    /// Light updates go to `/lights/{id}/state`, so only `state.*` fields
    /// can be written there.
    pub fn mutation_scope(self) -> Option<&'static str> {
        match self {
            Self::Lights => Some("state"),
            Self::Sensors | Self::Scenes | Self::Config => None,
        }
    }

    /// PUT path for one row. The row id is ignored for `config`.
    pub fn mutation_path(self, row_id: &str) -> String {
        match self {
            Self::Config => "config".into(),
            _ => match self.mutation_scope() {
                Some(scope) => format!("{}/{row_id}/{scope}", self.path_segment()),
                None => format!("{}/{row_id}", self.path_segment()),
            },
        }
    }
}

/// How key-value (nested object) columns are placed into a row.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum KvType {
    /// Serialized JSON text.
    #[default]
    #[strum(serialize = "json")]
    Json,
    /// The nested object itself. `hstore` is accepted as an alias.
    #[strum(to_string = "structured", serialize = "hstore")]
    Structured,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn parses_kind_case_insensitively() {
        assert_eq!("Lights".parse::<ResourceKind>().unwrap(), ResourceKind::Lights);
        assert_eq!("CONFIG".parse::<ResourceKind>().unwrap(), ResourceKind::Config);
        assert!("groups".parse::<ResourceKind>().is_err());
    }

    #[test]
    fn mutation_paths() {
        assert_eq!(ResourceKind::Lights.mutation_path("3"), "lights/3/state");
        assert_eq!(ResourceKind::Sensors.mutation_path("7"), "sensors/7");
        assert_eq!(ResourceKind::Scenes.mutation_path("ab12"), "scenes/ab12");
        assert_eq!(ResourceKind::Config.mutation_path("ignored"), "config");
    }

    #[test]
    fn path_segment_matches_display() {
        for kind in ResourceKind::iter() {
            assert_eq!(kind.path_segment(), kind.to_string());
        }
    }

    #[test]
    fn kv_type_aliases() {
        assert_eq!("json".parse::<KvType>().unwrap(), KvType::Json);
        assert_eq!("HSTORE".parse::<KvType>().unwrap(), KvType::Structured);
        assert_eq!("structured".parse::<KvType>().unwrap(), KvType::Structured);
        assert_eq!(KvType::Structured.to_string(), "structured");
        assert!("xml".parse::<KvType>().is_err());
    }
}
