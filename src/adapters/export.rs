use crate::domain::model::Group;
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};

pub const EXPORT_HEADER: &str = "Team Name,Member Name\n";

/// Serialises groups as `"team","member"` rows under a plain header.
pub fn groups_to_csv(groups: &[Group]) -> Result<Vec<u8>> {
    let mut buf = EXPORT_HEADER.as_bytes().to_vec();
    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .quote_style(csv::QuoteStyle::Always)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(&mut buf);

        for group in groups {
            for member in &group.members {
                writer.write_record([group.name.as_str(), member.name.as_str()])?;
            }
        }
        writer.flush()?;
    }
    Ok(buf)
}

pub fn export_filename(now: DateTime<Utc>) -> String {
    format!("group_results_{}.csv", now.timestamp_millis())
}

pub struct GroupExporter<S: Storage> {
    storage: S,
}

impl<S: Storage> GroupExporter<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Writes the CSV through storage and returns the written path.
    pub async fn export(&self, groups: &[Group]) -> Result<String> {
        let data = groups_to_csv(groups)?;
        let filename = export_filename(Utc::now());
        tracing::debug!("Exporting {} groups to {}", groups.len(), filename);
        let path = self.storage.write_file(&filename, &data).await?;
        tracing::info!(groups = groups.len(), "📁 Groups exported to: {}", path);
        Ok(path)
    }
}
