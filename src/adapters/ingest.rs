use crate::utils::error::Result;
use std::path::Path;

/// One name per line; lines are trimmed and blanks dropped.
pub fn parse_text_list(text: &str) -> Vec<String> {
    text.split('\n')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

/// Names separated by commas or newlines. No quoting support, so a name
/// cannot contain a comma.
pub fn parse_csv(text: &str) -> Vec<String> {
    text.split([',', '\n'])
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

/// `.csv` files are tokenised with [`parse_csv`], everything else as a
/// plain list.
pub async fn read_names_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path).await?;
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    let names = if is_csv {
        parse_csv(&content)
    } else {
        parse_text_list(&content)
    };
    tracing::info!("📥 Read {} names from {}", names.len(), path.display());
    Ok(names)
}
