use teledash::config::ConfigManager;
use teledash::filter::{CriteriaSet, FacetCriterion, RangeCriterion};
use teledash::template::TemplateManager;

fn sample_criteria() -> CriteriaSet {
    let mut criteria = CriteriaSet::passthrough();
    criteria.age = Some(RangeCriterion::new("age", 30, 40));
    criteria.facets[0] = FacetCriterion::new("job", vec!["admin.".to_string()]);
    criteria
}

#[test]
fn create_and_reload_template() {
    let dir = tempfile::tempdir().unwrap();
    let config = ConfigManager::with_dir(dir.path().join("teledash"));

    let mut manager = TemplateManager::new(&config).unwrap();
    assert!(manager.all_templates().is_empty());

    let created = manager
        .create_template(
            "admins-30s".to_string(),
            Some("admins aged 30-40".to_string()),
            sample_criteria(),
            Some("y".to_string()),
        )
        .unwrap();
    assert!(manager.template_exists("admins-30s"));

    // A fresh manager sees the template on disk
    let reloaded = TemplateManager::new(&config).unwrap();
    let template = reloaded.get_template_by_name("admins-30s").unwrap();
    assert_eq!(template.id, created.id);
    assert_eq!(template.criteria, sample_criteria());
    assert_eq!(template.target.as_deref(), Some("y"));
}

#[test]
fn unknown_template_lookup_is_none() {
    let dir = tempfile::tempdir().unwrap();
    let config = ConfigManager::with_dir(dir.path().join("teledash"));
    let manager = TemplateManager::new(&config).unwrap();
    assert!(manager.get_template_by_name("nope").is_none());
}

#[test]
fn remove_all_templates_clears_disk_and_memory() {
    let dir = tempfile::tempdir().unwrap();
    let config = ConfigManager::with_dir(dir.path().join("teledash"));

    let mut manager = TemplateManager::new(&config).unwrap();
    manager
        .create_template("a".to_string(), None, sample_criteria(), None)
        .unwrap();
    manager
        .create_template("b".to_string(), None, CriteriaSet::passthrough(), None)
        .unwrap();
    assert_eq!(manager.all_templates().len(), 2);

    manager.remove_all_templates().unwrap();
    assert!(manager.all_templates().is_empty());

    let reloaded = TemplateManager::new(&config).unwrap();
    assert!(reloaded.all_templates().is_empty());
}
