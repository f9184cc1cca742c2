//! Integration tests for dataset and image map generation

use handbook_scraper::config::Config;
use handbook_scraper::extract::{ChallengeRecord, EntityName};
use handbook_scraper::output::{write_dataset, write_image_map, Dataset};
use handbook_scraper::{EntityKind, Record};
use tempfile::tempdir;

fn challenge(name: &str, category: &str) -> Record {
    Record::Challenge(ChallengeRecord {
        name: EntityName::new(name).unwrap(),
        wiki_url: "https://riskofrain2.fandom.com/wiki/Challenges".to_string(),
        image: None,
        description: Some("Do the thing.".to_string()),
        unlock: None,
        category: category.to_string(),
    })
}

#[test]
fn test_dataset_written_under_configured_data_dir() {
    let dir = tempdir().unwrap();
    let mut config = Config::default();
    config.output.data_dir = dir.path().join("src").join("static");

    let mut dataset = Dataset::new();
    dataset.insert("Warrior".to_string(), challenge("Warrior", "survivors"));
    dataset.insert("Cleanup Duty".to_string(), challenge("Cleanup Duty", "items"));

    let path = config.dataset_path(EntityKind::Challenge);
    write_dataset(&path, &dataset).unwrap();

    let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let object = written.as_object().unwrap();
    assert_eq!(object.len(), 2);
    assert_eq!(object["Warrior"]["category"], "survivors");
    assert_eq!(object["Warrior"]["type"], "challenge");
    assert_eq!(object["Warrior"]["wikiUrl"], "https://riskofrain2.fandom.com/wiki/Challenges");
    assert!(object["Warrior"].get("unlock").is_none());
}

#[test]
fn test_rewrite_is_byte_identical() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("challenge_data.json");

    let mut dataset = Dataset::new();
    dataset.insert("Warrior".to_string(), challenge("Warrior", "survivors"));

    write_dataset(&path, &dataset).unwrap();
    let first = std::fs::read(&path).unwrap();
    write_dataset(&path, &dataset).unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), first);
}

#[test]
fn test_gencode_maps_cached_images() {
    let dir = tempdir().unwrap();
    let images = dir.path().join("imgs");
    std::fs::create_dir_all(&images).unwrap();
    for name in ["Crowbar.png", "Aegis.jpg", "Soldier'sSyringe.png", "images.js"] {
        std::fs::write(images.join(name), b"x").unwrap();
    }

    let out = images.join("images.js");
    let count = write_image_map(&images, &out).unwrap();
    assert_eq!(count, 3);

    let code = std::fs::read_to_string(&out).unwrap();
    assert!(code.starts_with("export default {\n  \"Aegis\": require(\"./Aegis.jpg\"),"));
    assert!(code.contains("\"Soldier'sSyringe\": require(\"./Soldier'sSyringe.png\")"));

    // Regenerating over the previous output gives the same file
    write_image_map(&images, &out).unwrap();
    assert_eq!(std::fs::read_to_string(&out).unwrap(), code);
}
