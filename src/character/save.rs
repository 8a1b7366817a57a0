use crate::core::constants::{MAX_NAME_LEN, SAVE_DIR_NAME, SAVE_VERSION};
use crate::core::game_state::CultivatorState;
use crate::realm::Realm;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Serialize, Deserialize)]
struct CharacterSaveData {
    #[serde(default)]
    version: u32,
    #[serde(default)]
    cultivator: CultivatorState,
}

/// Summary of a save file for the character select list.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterInfo {
    pub character_id: String,
    pub character_name: String,
    pub filename: String,
    pub realm: Realm,
    pub stage: u32,
    pub last_save_time: i64,
    pub is_corrupted: bool,
}

/// One pretty-printed JSON file per character.
pub struct CharacterManager {
    save_dir: PathBuf,
}

impl CharacterManager {
    /// Uses `~/.cultivator`, creating it if needed.
    pub fn new() -> io::Result<Self> {
        let home_dir = dirs::home_dir().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                "Could not determine home directory",
            )
        })?;
        Self::with_dir(home_dir.join(SAVE_DIR_NAME))
    }

    pub fn with_dir(save_dir: PathBuf) -> io::Result<Self> {
        fs::create_dir_all(&save_dir)?;
        Ok(Self { save_dir })
    }

    pub fn save_dir(&self) -> &Path {
        &self.save_dir
    }

    pub fn filename_for(name: &str) -> String {
        format!("{}.json", sanitize_name(name))
    }

    /// Writes the character and returns the file name used.
    pub fn save_character(&self, state: &CultivatorState) -> io::Result<String> {
        let save_data = CharacterSaveData {
            version: SAVE_VERSION,
            cultivator: state.clone(),
        };
        let json = serde_json::to_string_pretty(&save_data)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let filename = Self::filename_for(&state.character_name);
        fs::write(self.save_dir.join(&filename), json)?;
        info!(character = %state.character_name, %filename, "character saved");
        Ok(filename)
    }

    /// Loads a character. Missing fields take their defaults and the fixed
    /// comprehension and element keys are restored.
    pub fn load_character(&self, filename: &str) -> io::Result<CultivatorState> {
        let json_content = fs::read_to_string(self.save_dir.join(filename))?;
        let save_data: CharacterSaveData = serde_json::from_str(&json_content)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        if save_data.version > SAVE_VERSION {
            warn!(
                version = save_data.version,
                supported = SAVE_VERSION,
                "save written by a newer version"
            );
        }

        let mut state = save_data.cultivator;
        state.normalize();
        Ok(state)
    }

    /// All saves in the directory, most recently saved first. Files that
    /// fail to parse are listed as corrupted rather than skipped.
    pub fn list_characters(&self) -> io::Result<Vec<CharacterInfo>> {
        let mut characters = Vec::new();

        for entry in fs::read_dir(&self.save_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let filename = path
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("")
                .to_string();

            match self.load_character(&filename) {
                Ok(state) => characters.push(CharacterInfo {
                    character_id: state.character_id,
                    character_name: state.character_name,
                    filename,
                    realm: state.realm,
                    stage: state.stage,
                    last_save_time: state.last_save_time,
                    is_corrupted: false,
                }),
                Err(err) => {
                    warn!(%filename, %err, "unreadable save file");
                    characters.push(CharacterInfo {
                        character_id: String::new(),
                        character_name: "[CORRUPTED]".to_string(),
                        filename,
                        realm: Realm::default(),
                        stage: 0,
                        last_save_time: 0,
                        is_corrupted: true,
                    });
                }
            }
        }

        characters.sort_by(|a, b| b.last_save_time.cmp(&a.last_save_time));
        Ok(characters)
    }

    pub fn delete_character(&self, filename: &str) -> io::Result<()> {
        fs::remove_file(self.save_dir.join(filename))?;
        info!(%filename, "character deleted");
        Ok(())
    }
}

pub fn validate_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err("Name cannot be empty".to_string());
    }

    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(format!("Name must be {MAX_NAME_LEN} characters or less"));
    }

    let valid_chars = trimmed
        .chars()
        .all(|c| c.is_alphanumeric() || c == ' ' || c == '-' || c == '_');
    if !valid_chars {
        return Err(
            "Name can only contain letters, numbers, spaces, hyphens, and underscores".to_string(),
        );
    }

    Ok(())
}

pub fn sanitize_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .replace(' ', "_")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{EffectDuration, OngoingEffect, Polarity};
    use crate::locations::LocationId;
    use crate::stones::Grade;

    fn test_manager() -> CharacterManager {
        use std::sync::atomic::{AtomicU64, Ordering};
        static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

        let test_id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir().join(format!(
            "cultivator-save-test-{}-{}",
            std::process::id(),
            test_id
        ));
        let _ = fs::remove_dir_all(&dir);
        CharacterManager::with_dir(dir).unwrap()
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Lin Feng").is_ok());
        assert!(validate_name("Sword-Saint_9").is_ok());
        assert!(validate_name("   ").is_err());
        assert!(validate_name("12345678901234567").is_err());
        assert!(validate_name("abcdefghijklmnop").is_ok());
        assert!(validate_name("qi@master").is_err());
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("Lin Feng"), "lin_feng");
        assert_eq!(sanitize_name("  Azure-Dragon  "), "azure-dragon");
        assert_eq!(sanitize_name("Dao!!!"), "dao");
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let manager = test_manager();
        let mut state = CultivatorState::new("Lin Feng".to_string(), 1_700_000_000);
        state.realm = Realm::CoreFormation;
        state.stage = 6;
        state.experience = 123;
        state.foundation_quality = 175;
        state.add_comprehension("sword", 14);
        state.add_affinity("lightning", 22);
        state.primary_element = Some("lightning".to_string());
        state.secondary_elements = vec!["fire".to_string()];
        state.spirit_stones.add(Grade::Peak, 2);
        state.ongoing_effects.push(OngoingEffect {
            name: "Chaotic Qi".to_string(),
            polarity: Polarity::Negative,
            description: "Unstable qi".to_string(),
            exp_multiplier: 0.9,
            remaining: EffectDuration::Sessions(3),
        });
        state.encounters.sessions_since_encounter = 11;
        state.encounters.session_counter = 80;
        state.location = LocationId::DragonsPeak;
        state.choices.sessions_since_choice = 4;
        state.choices.last_choice = Some("Mine carefully around the formation".to_string());
        state.breakthrough_guidance = 0.15;

        let filename = manager.save_character(&state).unwrap();
        assert_eq!(filename, "lin_feng.json");
        let loaded = manager.load_character(&filename).unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn test_missing_fields_default() {
        let manager = test_manager();
        let json = r#"{
            "version": 1,
            "cultivator": {
                "character_name": "Old Save",
                "realm": "Qi Gathering",
                "stage": 4,
                "dao_comprehension": { "fire": 3, "wisdom": 9 }
            }
        }"#;
        fs::write(manager.save_dir().join("old_save.json"), json).unwrap();

        let state = manager.load_character("old_save.json").unwrap();
        assert_eq!(state.character_name, "Old Save");
        assert_eq!(state.realm, Realm::QiGathering);
        assert_eq!(state.stage, 4);
        assert_eq!(state.foundation_quality, 10);
        assert_eq!(state.dao_comprehension["fire"], 3);
        assert_eq!(state.dao_comprehension["sword"], 0);
        assert!(!state.dao_comprehension.contains_key("wisdom"));
        assert_eq!(state.recovery_time, 0);
        assert!(state.ongoing_effects.is_empty());
        assert_eq!(state.location, LocationId::PeacefulValley);
        assert_eq!(state.choices.sessions_since_choice, 0);
    }

    #[test]
    fn test_locked_location_in_save_falls_back() {
        let manager = test_manager();
        let json = r#"{ "cultivator": { "character_name": "Wanderer", "realm": "Qi Gathering", "location": "AncientRuins" } }"#;
        fs::write(manager.save_dir().join("wanderer.json"), json).unwrap();
        let state = manager.load_character("wanderer.json").unwrap();
        assert_eq!(state.location, LocationId::PeacefulValley);
    }

    #[test]
    fn test_partial_effects_and_history_default() {
        let manager = test_manager();
        let json = r#"{
            "cultivator": {
                "character_name": "Patchy",
                "ongoing_effects": [
                    { "name": "Qi Stagnation", "polarity": "Negative", "exp_multiplier": 0.85 },
                    { "name": "Sudden Clarity", "remaining": { "Sessions": 2 } }
                ],
                "history": [ { "session": 7, "final_exp": 12, "encounter": { "name": "Spatial Rift" } } ]
            }
        }"#;
        fs::write(manager.save_dir().join("patchy.json"), json).unwrap();

        let state = manager.load_character("patchy.json").unwrap();
        assert_eq!(state.ongoing_effects.len(), 2);
        let stagnation = &state.ongoing_effects[0];
        assert_eq!(stagnation.remaining, EffectDuration::UntilCured);
        assert_eq!(stagnation.exp_multiplier, 0.85);
        let clarity = &state.ongoing_effects[1];
        assert_eq!(clarity.polarity, Polarity::Negative);
        assert_eq!(clarity.exp_multiplier, 1.0);
        assert_eq!(clarity.remaining, EffectDuration::Sessions(2));

        let summary = state.history.back().unwrap();
        assert_eq!(summary.session, 7);
        assert_eq!(summary.final_exp, 12);
        assert_eq!(summary.base_exp, 0);
        assert_eq!(summary.encounter.as_ref().map(|e| e.name.as_str()), Some("Spatial Rift"));
    }

    #[test]
    fn test_unknown_realm_loads_as_lowest() {
        let manager = test_manager();
        let json = r#"{ "cultivator": { "character_name": "Ghost", "realm": "Dao Ancestor" } }"#;
        fs::write(manager.save_dir().join("ghost.json"), json).unwrap();
        let state = manager.load_character("ghost.json").unwrap();
        assert_eq!(state.realm, Realm::BodyTempering);
    }

    #[test]
    fn test_list_and_delete() {
        let manager = test_manager();
        let mut older = CultivatorState::new("Elder".to_string(), 1_000);
        older.stage = 3;
        let newer = CultivatorState::new("Disciple".to_string(), 2_000);
        manager.save_character(&older).unwrap();
        manager.save_character(&newer).unwrap();
        fs::write(manager.save_dir().join("broken.json"), "{ not json").unwrap();
        fs::write(manager.save_dir().join("notes.txt"), "ignored").unwrap();

        let list = manager.list_characters().unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list[0].character_name, "Disciple");
        assert_eq!(list[1].character_name, "Elder");
        assert_eq!(list[1].stage, 3);
        assert!(list[2].is_corrupted);

        manager.delete_character("elder.json").unwrap();
        assert!(!manager.save_dir().join("elder.json").exists());
        assert!(manager.delete_character("elder.json").is_err());
    }
}
