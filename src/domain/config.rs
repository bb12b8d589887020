use std::path::Path;

use serde::{Deserialize, Serialize};

/// Configuration for the lending system.
///
/// Lives as `config.toml` in the data root. Controls the due-date policy,
/// the zero-pad width of sequence IDs, and the email domain lists used for
/// role classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Days added to a borrow date to compute the due date.
    due_days: u32,

    /// The number of digits sequence IDs are padded to.
    ///
    /// For example, `T001` (3 digits) or `T0001` (4 digits).
    digits: usize,

    /// Email domain suffixes that classify as student.
    ///
    /// Checked before `staff_domains`.
    student_domains: Vec<String>,

    /// Email domain suffixes that classify as staff.
    staff_domains: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            due_days: default_due_days(),
            digits: default_digits(),
            student_domains: default_student_domains(),
            staff_domains: default_staff_domains(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or
    /// if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Returns the due-date offset in days.
    #[must_use]
    pub const fn due_days(&self) -> u32 {
        self.due_days
    }

    /// Returns the number of digits for padding sequence IDs.
    #[must_use]
    pub const fn digits(&self) -> usize {
        self.digits
    }

    /// Returns the student domain suffixes.
    #[must_use]
    pub fn student_domains(&self) -> &[String] {
        &self.student_domains
    }

    /// Returns the staff domain suffixes.
    #[must_use]
    pub fn staff_domains(&self) -> &[String] {
        &self.staff_domains
    }

    /// Sets the due-date offset.
    pub const fn set_due_days(&mut self, days: u32) {
        self.due_days = days;
    }
}

const fn default_due_days() -> u32 {
    3
}

const fn default_digits() -> usize {
    3
}

fn default_student_domains() -> Vec<String> {
    vec!["alustudent.com".to_string()]
}

fn default_staff_domains() -> Vec<String> {
    vec!["alueducation.com".to_string()]
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the
/// domain type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_due_days")]
        due_days: u32,

        #[serde(default = "default_digits")]
        digits: usize,

        #[serde(default = "default_student_domains")]
        student_domains: Vec<String>,

        #[serde(default = "default_staff_domains")]
        staff_domains: Vec<String>,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                due_days,
                digits,
                student_domains,
                staff_domains,
            } => Self {
                due_days,
                digits,
                student_domains,
                staff_domains,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            due_days: config.due_days,
            digits: config.digits,
            student_domains: config.student_domains,
            staff_domains: config.staff_domains,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\ndue_days = 7\ndigits = 4\nstudent_domains = [\"students.campus.edu\"]\nstaff_domains = [\"campus.edu\"]\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.due_days(), 7);
        assert_eq!(config.digits(), 4);
        assert_eq!(config.student_domains(), ["students.campus.edu"]);
        assert_eq!(config.staff_domains(), ["campus.edu"]);
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(error.starts_with("Failed to read config file:"));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\ndue_days = \"three\"\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.starts_with("Failed to parse config file:"));
    }

    #[test]
    fn empty_file_returns_default() {
        // Deserialising a file carrying only the version tag yields the
        // default configuration.
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn round_trips_through_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");

        let mut config = Config::default();
        config.set_due_days(14);
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }
}
