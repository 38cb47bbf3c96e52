/// Parse a `User-Agent` string into (browser, os) via the `woothee` crate.
///
/// Best-effort: an empty or unclassifiable UA yields empty strings.
pub fn parse_user_agent(user_agent: &str) -> (String, String) {
    if user_agent.is_empty() {
        return (String::new(), String::new());
    }
    match woothee::parser::Parser::new().parse(user_agent) {
        Some(result) => (normalize(result.name), normalize(result.os)),
        None => (String::new(), String::new()),
    }
}

// woothee reports unknowns as the sentinel "UNKNOWN"; stats treat that the
// same as unparseable.
fn normalize(value: &str) -> String {
    if value == "UNKNOWN" {
        String::new()
    } else {
        value.to_string()
    }
}
