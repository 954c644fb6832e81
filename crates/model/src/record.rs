use serde::{Deserialize, Deserializer, Serialize};

/// Number of persisted fields on an [`EventRecord`].
pub const FIELD_COUNT: usize = 21;

/// A single playback event from a streaming history export.
///
/// Field names on the wire follow the export exactly. `Option` fields are
/// nullable: absent or `null` means unknown, which is not the same as
/// `false` or an empty string. The remaining fields must be present, but an
/// explicit `null` decodes to the type's zero value (podcast rows carry
/// `null` track metadata).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// ISO-8601 end-of-playback timestamp, kept verbatim.
    #[serde(deserialize_with = "null_as_default")]
    pub ts: String,
    #[serde(deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(deserialize_with = "null_as_default")]
    pub platform: String,
    #[serde(deserialize_with = "null_as_default")]
    pub ms_played: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub conn_country: String,
    #[serde(deserialize_with = "null_as_default")]
    pub ip_addr_decrypted: String,
    #[serde(deserialize_with = "null_as_default")]
    pub user_agent_decrypted: String,

    #[serde(
        rename = "master_metadata_track_name",
        deserialize_with = "null_as_default"
    )]
    pub track_name: String,
    #[serde(
        rename = "master_metadata_album_artist_name",
        deserialize_with = "null_as_default"
    )]
    pub album_artist_name: String,
    // The export really does spell this field with "album" twice.
    #[serde(
        rename = "master_metadata_album_album_name",
        deserialize_with = "null_as_default"
    )]
    pub album_name: String,
    #[serde(rename = "spotify_track_uri", deserialize_with = "null_as_default")]
    pub track_uri: String,

    pub episode_name: Option<String>,
    pub episode_show_name: Option<String>,
    #[serde(rename = "spotify_episode_uri")]
    pub episode_uri: Option<String>,

    #[serde(deserialize_with = "null_as_default")]
    pub reason_start: String,
    #[serde(deserialize_with = "null_as_default")]
    pub reason_end: String,
    #[serde(deserialize_with = "null_as_default")]
    pub shuffle: bool,
    pub skipped: Option<bool>,
    #[serde(deserialize_with = "null_as_default")]
    pub offline: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub offline_timestamp: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub incognito_mode: bool,
}

/// `null` becomes `T::default()`; a missing key is still an error because
/// the field carries no `#[serde(default)]`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
