/// Interprets an environment-variable value as a boolean toggle.
///
/// Deployment flags (e.g. `DPG_EMIT_DONATION_RECEIPTS`) accept the usual spellings: `1`/`true`/`yes`/`on` and
/// `0`/`false`/`no`/`off`, case-insensitively and ignoring surrounding whitespace. An unset variable or an
/// unrecognised value falls back to `default`.
pub fn parse_boolean_flag(value: Option<String>, default: bool) -> bool {
    let Some(value) = value else {
        return default;
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}
