use tally_core::Statement;

/// Records whose description contains `query`, ignoring case.
///
/// A blank query returns the statement unchanged.
pub fn by_description(statement: &Statement, query: &str) -> Statement {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return statement.clone();
    }
    statement.retain_matching(|r| r.description.to_lowercase().contains(&needle))
}
