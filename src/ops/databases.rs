use std::path::PathBuf;

use super::Operation;
use crate::common::errors::MaintError;
use crate::common::format;
use crate::orchestrator::context::OpContext;

/// VACUUM the SQLite stores that grow without bound in daily use: the
/// Mail envelope index and Safari's databases. A database that fails to
/// vacuum (locked, corrupt, app running) is a warning, not a failure.
pub struct SqliteVacuum;

/// Mail keeps its envelope index under a versioned directory (`V2`,
/// `V10`, ...) that moves between macOS releases, so discover it.
fn mail_envelope_indexes(home: &std::path::Path) -> Vec<PathBuf> {
    let mail = home.join("Library/Mail");
    let Ok(entries) = std::fs::read_dir(&mail) else {
        return Vec::new();
    };
    entries
        .flatten()
        .filter(|e| {
            e.file_name()
                .to_string_lossy()
                .strip_prefix('V')
                .map(|rest| rest.chars().all(|c| c.is_ascii_digit()))
                .unwrap_or(false)
        })
        .map(|e| e.path().join("MailData/Envelope Index"))
        .filter(|p| p.is_file())
        .collect()
}

fn safari_databases(home: &std::path::Path) -> Vec<PathBuf> {
    let safari = home.join("Library/Safari");
    let Ok(entries) = std::fs::read_dir(&safari) else {
        return Vec::new();
    };
    entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().map(|ext| ext == "db").unwrap_or(false))
        .collect()
}

impl Operation for SqliteVacuum {
    fn id(&self) -> &'static str {
        "sqlite-vacuum"
    }

    fn execute(&self, ctx: &mut OpContext) -> Result<(), MaintError> {
        let home = match dirs::home_dir() {
            Some(home) => home,
            None => {
                ctx.warn("no home directory, nothing to vacuum");
                return Ok(());
            }
        };

        let mut databases = mail_envelope_indexes(&home);
        databases.extend(safari_databases(&home));

        if databases.is_empty() {
            ctx.info("no application databases found");
            return Ok(());
        }

        ctx.begin_steps(databases.len() as u64);
        let mut vacuumed = 0usize;
        let mut freed = 0u64;
        for db in &databases {
            let db_str = db.to_string_lossy().into_owned();
            let before = ctx.measure(db);
            if ctx.run_ancillary("sqlite3", &[&db_str, "VACUUM;"]) {
                vacuumed += 1;
                let after = ctx.measure(db);
                freed += ctx.record_freed(before, after);
            }
            ctx.step(&db_str);
        }

        ctx.info(&format!(
            "{}/{} databases vacuumed, {} freed",
            vacuumed,
            databases.len(),
            format::format_kb(freed)
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mail_discovery_takes_versioned_dirs_only() {
        let dir = tempfile::tempdir().unwrap();
        let home = dir.path();
        for name in ["V2", "V10", "Vx", "PersistenceInfo"] {
            std::fs::create_dir_all(home.join("Library/Mail").join(name).join("MailData"))
                .unwrap();
        }
        std::fs::write(
            home.join("Library/Mail/V2/MailData/Envelope Index"),
            "x",
        )
        .unwrap();
        std::fs::write(
            home.join("Library/Mail/V10/MailData/Envelope Index"),
            "x",
        )
        .unwrap();
        std::fs::create_dir_all(home.join("Library/Mail/Vx/MailData")).unwrap();
        std::fs::write(home.join("Library/Mail/Vx/MailData/Envelope Index"), "x").unwrap();

        let mut found: Vec<String> = mail_envelope_indexes(home)
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();
        found.sort();
        assert_eq!(found.len(), 2);
        assert!(found[0].contains("V10"));
        assert!(found[1].contains("V2"));
    }

    #[test]
    fn test_safari_discovery_takes_db_files_only() {
        let dir = tempfile::tempdir().unwrap();
        let home = dir.path();
        let safari = home.join("Library/Safari");
        std::fs::create_dir_all(&safari).unwrap();
        std::fs::write(safari.join("History.db"), "x").unwrap();
        std::fs::write(safari.join("CloudTabs.db"), "x").unwrap();
        std::fs::write(safari.join("Bookmarks.plist"), "x").unwrap();
        std::fs::create_dir(safari.join("Extensions.db")).unwrap();

        let found = safari_databases(home);
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|p| p.extension().unwrap() == "db"));
    }

    #[test]
    fn test_discovery_on_missing_home_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(mail_envelope_indexes(&dir.path().join("nope")).is_empty());
        assert!(safari_databases(&dir.path().join("nope")).is_empty());
    }
}
