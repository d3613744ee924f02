/*!
 * Tests for the language catalog and self-exclusion
 */

use autotrans::app_config::{CatalogConfig, ExclusionMatch};
use autotrans::language_catalog::{compute_targets, normalize_language_name, LanguageCatalog, DEFAULT_LANGUAGES};
use crate::common;

/// Test that the configured catalog is numbered in sorted order
#[test]
fn test_from_config_withUnsortedNames_shouldNumberSorted() {
    let config = CatalogConfig {
        languages: vec!["Korean".to_string(), "French".to_string(), "Arabic".to_string()],
        exclusion_match: ExclusionMatch::Exact,
    };

    let catalog = LanguageCatalog::from_config(&config).unwrap();

    assert_eq!(catalog.display_names(), vec!["01. Arabic", "02. French", "03. Korean"]);
    assert_eq!(catalog.listing(), "01. Arabic, 02. French, 03. Korean");
}

/// Test that an empty catalog is refused
#[test]
fn test_from_config_withOnlyBlanks_shouldFail() {
    let config = CatalogConfig {
        languages: vec![" ".to_string(), String::new()],
        exclusion_match: ExclusionMatch::Exact,
    };

    assert!(LanguageCatalog::from_config(&config).is_err());
}

/// Test the built-in catalog
#[test]
fn test_default_catalog_shouldHoldEveryBuiltInLanguage() {
    let catalog = LanguageCatalog::default();

    assert_eq!(catalog.len(), DEFAULT_LANGUAGES.len());
    let last = catalog.get(catalog.len() as u32).unwrap();
    assert_eq!(last.name, "Vietnamese");
    assert!(catalog.get(0).is_none());
}

/// Test normalization of decorated model answers
#[test]
fn test_normalize_language_name_withDecoration_shouldStripIt() {
    assert_eq!(normalize_language_name("  **Korean**  "), "korean");
    assert_eq!(normalize_language_name("24. Korean."), "korean");
    assert_eq!(normalize_language_name("`Chinese   (Simplified)`"), "chinese (simplified)");
    assert_eq!(normalize_language_name("\"\""), "");
}

/// Test that a detected source language is removed from the selection
#[test]
fn test_compute_targets_withSourceSelected_shouldExcludeIt() {
    let selected = common::entries(&["English", "French", "Korean"]);

    let selection = compute_targets(&selected, "English", ExclusionMatch::Exact);

    assert_eq!(selection.excluded, common::entries(&["English"]));
    let names: Vec<&str> = selection.targets.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["French", "Korean"]);
}

/// Test that an unrelated detection keeps every selected language
#[test]
fn test_compute_targets_withUnselectedSource_shouldKeepAll() {
    let selected = common::entries(&["French", "Korean"]);

    let selection = compute_targets(&selected, "Japanese", ExclusionMatch::Exact);

    assert_eq!(selection.targets, selected);
    assert!(selection.excluded.is_empty());
}

/// Test the legacy substring rule against the display string
#[test]
fn test_compute_targets_withSubstringMatch_shouldCompareDisplayNames() {
    let selected = common::entries(&["Chinese (Simplified)", "Chinese (Traditional)", "French"]);

    let selection = compute_targets(&selected, "Chinese", ExclusionMatch::Substring);
    assert_eq!(selection.excluded.len(), 2);

    // Case-sensitive, like a plain containment test
    let selection = compute_targets(&selected, "chinese", ExclusionMatch::Substring);
    assert!(selection.excluded.is_empty());
}

/// Test resolution of code-style answers
#[test]
fn test_resolve_detected_withIsoCodes_shouldFindEntry() {
    let catalog = LanguageCatalog::default();

    let japanese = catalog.resolve_detected("ja", ExclusionMatch::Exact).unwrap();
    assert_eq!(japanese.name, "Japanese");
    assert!(catalog.resolve_detected("Unknown", ExclusionMatch::Exact).is_none());
    assert!(catalog.resolve_detected("ja", ExclusionMatch::Substring).is_none());
}

/// Test that a plain language answer excludes every regional variant
#[test]
fn test_compute_targets_withBaseLanguageAnswer_shouldExcludeVariants() {
    let catalog = LanguageCatalog::default();
    let selected = catalog.select(&["Chinese (Simplified)", "Chinese (Traditional)", "French"]).unwrap();

    for answer in ["Chinese", "zh", "chinese"] {
        let selection = compute_targets(&selected, answer, ExclusionMatch::Exact);

        let excluded: Vec<String> = selection.excluded.iter().map(|e| e.display_name()).collect();
        assert_eq!(excluded, vec!["04. Chinese (Simplified)", "05. Chinese (Traditional)"], "answer {:?}", answer);
        assert_eq!(selection.targets.len(), 1);
        assert_eq!(selection.targets[0].name, "French");
    }

    let resolved = catalog.resolve_detected("zh", ExclusionMatch::Exact).unwrap();
    assert_eq!(resolved.name, "Chinese (Simplified)");
}

/// Test that a full-name match keeps sibling variants as targets
#[test]
fn test_compute_targets_withFullNameMatch_shouldKeepVariants() {
    let catalog = LanguageCatalog::default();
    let selected = catalog.select(&["Portuguese", "Portuguese (Brazil)", "Portuguese (Portugal)"]).unwrap();

    let selection = compute_targets(&selected, "Portuguese", ExclusionMatch::Exact);

    assert_eq!(selection.excluded.len(), 1);
    assert_eq!(selection.excluded[0].name, "Portuguese");
    assert_eq!(selection.targets.len(), 2);
}
