//! Deterministic PDF filenames
//!
//! `{sanitized name}_{type token}_{date token}.pdf`, derived entirely from row
//! metadata so repeated runs produce the same names (collisions overwrite).

use crate::StatementRow;

/// Build the output filename for one statement row.
///
/// - name token: every non-word character of `nomeParticipante` becomes `_`
/// - type token: the text inside the first parenthesized abbreviation of
///   `tipoDemonstracao` ("Balanço Patrimonial (BP)" -> "BP"); without one, the
///   sanitized full type string, lowercased
/// - date token: `dataPublicacao` up to the first `T`, with `-` replaced by `_`
pub fn file_name(row: &StatementRow) -> String {
    let company_name = replace_with_underscore(&row.nome_participante);
    let statement_type = type_token(&row.tipo_demonstracao);
    let published_date = date_token(&row.data_publicacao);
    format!("{company_name}_{statement_type}_{published_date}.pdf")
}

/// Replace every non-word character with `_`.
///
/// Word characters are alphanumerics (Unicode) and the underscore, so
/// accented names like "Balanço" keep their letters.
fn replace_with_underscore(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Text inside the first `(...)` pair, if any.
fn parse_type(full_name: &str) -> Option<&str> {
    let open = full_name.find('(')?;
    let rest = &full_name[open + 1..];
    let close = rest.find(')')?;
    Some(&rest[..close])
}

fn type_token(full_name: &str) -> String {
    match parse_type(full_name) {
        Some(acronym) => acronym.to_string(),
        None => replace_with_underscore(full_name).to_lowercase(),
    }
}

fn date_token(full_date: &str) -> String {
    let date = full_date.split('T').next().unwrap_or(full_date);
    date.replace('-', "_")
}
