use tracksink_model::FIELD_COUNT;
use tracksink_runtime::EVENT_TABLE;

/// Destination columns in parameter order.
pub const COLUMNS: [&str; FIELD_COUNT] = [
    "ts",
    "username",
    "platform",
    "ms_played",
    "conn_country",
    "ip_addr_decrypted",
    "user_agent_decrypted",
    "master_metadata_track_name",
    "master_metadata_album_artist_name",
    "master_metadata_album_name",
    "spotify_track_uri",
    "episode_name",
    "episode_show_name",
    "spotify_episode_uri",
    "reason_start",
    "reason_end",
    "shuffle",
    "skipped",
    "offline",
    "offline_timestamp",
    "incognito_mode",
];

/// One-row insert into [`EVENT_TABLE`]; `$n` binds the n-th entry of [`COLUMNS`].
pub fn insert_statement() -> String {
    let placeholders: Vec<String> = (1..=COLUMNS.len()).map(|n| format!("${n}")).collect();
    format!(
        "INSERT INTO {EVENT_TABLE} ({}) VALUES ({})",
        COLUMNS.join(", "),
        placeholders.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_targets_event_table() {
        assert!(insert_statement().starts_with("INSERT INTO song_streaming ("));
    }

    #[test]
    fn insert_lists_columns_in_order() {
        let sql = insert_statement();
        let open = sql.find('(').unwrap();
        let close = sql.find(')').unwrap();
        let listed: Vec<&str> = sql[open + 1..close].split(',').map(str::trim).collect();

        assert_eq!(listed, COLUMNS);
        assert_eq!(listed[9], "master_metadata_album_name");
    }

    #[test]
    fn insert_has_one_placeholder_per_column() {
        let sql = insert_statement();
        let values = &sql[sql.find("VALUES").unwrap()..];
        let expected: Vec<String> = (1..=FIELD_COUNT).map(|n| format!("${n}")).collect();

        assert_eq!(values, format!("VALUES ({})", expected.join(", ")));
    }
}
