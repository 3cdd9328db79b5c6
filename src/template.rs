//! Named, persisted filter criteria sets.
//!
//! Templates live as JSON files in the config directory and can be applied
//! by name from the command line.

use color_eyre::Result;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::io::Write;
use std::path::PathBuf;
use std::time::SystemTime;

use crate::config::ConfigManager;
use crate::filter::CriteriaSet;

// Custom serialization for SystemTime (convert to/from seconds since epoch)
mod time_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::{SystemTime, UNIX_EPOCH};

    pub fn serialize<S>(time: &SystemTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let duration = time.duration_since(UNIX_EPOCH).map_err(|e| {
            serde::ser::Error::custom(format!("Failed to serialize SystemTime: {}", e))
        })?;
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SystemTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(UNIX_EPOCH + std::time::Duration::from_secs(secs))
    }
}

/// A saved filter: name plus the full criteria set and optionally the
/// target column it was built for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "time_serde")]
    pub created: SystemTime,
    pub criteria: CriteriaSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub target: Option<String>,
}

pub struct TemplateManager {
    config: ConfigManager,
    templates: Vec<Template>,
    pub(crate) templates_dir: PathBuf,
}

impl TemplateManager {
    pub fn new(config: &ConfigManager) -> Result<Self> {
        // Directories are created lazily when a template is actually saved
        let templates_dir = config.config_dir().join("templates");

        let mut manager = Self {
            config: config.clone(),
            templates: Vec::new(),
            templates_dir,
        };
        manager.load_templates()?;
        Ok(manager)
    }

    pub fn load_templates(&mut self) -> Result<()> {
        self.templates.clear();

        if !self.templates_dir.exists() {
            return Ok(());
        }

        for entry in fs::read_dir(&self.templates_dir)? {
            let entry = entry?;
            let path = entry.path();

            if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json") {
                if let Ok(content) = fs::read_to_string(&path) {
                    match serde_json::from_str::<Template>(&content) {
                        Ok(template) => self.templates.push(template),
                        Err(e) => {
                            eprintln!("Warning: Could not parse template file {:?}: {}", path, e);
                        }
                    }
                }
            }
        }

        self.templates.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(())
    }

    pub fn save_template(&self, template: &Template) -> Result<()> {
        self.config.ensure_config_dir()?;
        fs::create_dir_all(&self.templates_dir)?;

        let filename = format!("template_{}.json", template.id);
        let file_path = self.templates_dir.join(filename);
        let json = serde_json::to_string_pretty(template)?;

        // Use file locking to prevent race conditions
        use fs2::FileExt;
        let mut file = fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&file_path)?;

        file.lock_exclusive()?;
        file.write_all(json.as_bytes())?;
        file.flush()?;
        fs2::FileExt::unlock(&file)?;

        Ok(())
    }

    pub fn template_exists(&self, name: &str) -> bool {
        self.templates.iter().any(|t| t.name == name)
    }

    pub fn get_template_by_name(&self, name: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.name == name)
    }

    pub fn all_templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn create_template(
        &mut self,
        name: String,
        description: Option<String>,
        criteria: CriteriaSet,
        target: Option<String>,
    ) -> Result<Template> {
        // Unique ID from name and timestamp
        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
            .hash(&mut hasher);
        let id = format!("{:016x}", hasher.finish());

        let template = Template {
            id,
            name,
            description,
            created: SystemTime::now(),
            criteria,
            target,
        };

        self.save_template(&template)?;
        self.load_templates()?;

        Ok(template)
    }

    pub fn remove_all_templates(&mut self) -> Result<()> {
        if self.templates_dir.exists() {
            for entry in fs::read_dir(&self.templates_dir)? {
                let entry = entry?;
                let path = entry.path();
                if path.is_file()
                    && path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .map(|s| s.starts_with("template_") && s.ends_with(".json"))
                        .unwrap_or(false)
                {
                    fs::remove_file(&path)?;
                }
            }
        }

        self.templates.clear();
        Ok(())
    }
}
