pub const PARSE_ERROR: &str = "Can't parse the regular expression";

pub fn verdict(subject: &str, matched: bool) -> String {
    if matched {
        format!("The string '{subject}' matches")
    } else {
        format!("The string '{subject}' doesn't match")
    }
}
