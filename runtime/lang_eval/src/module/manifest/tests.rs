#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_parse_native_manifest() {
    let manifest =
        parse_manifest("name = demo\nmoduleType = native\nnativeEntryPoint = Main\n").unwrap();
    assert_eq!(manifest.name(), "demo");
    assert_eq!(manifest.module_type(), ModuleType::Native);
    assert_eq!(manifest.native_entry_point(), Some("Main"));
    assert_eq!(manifest.description(), None);
}

#[test]
fn test_missing_name_fails() {
    assert!(matches!(
        parse_manifest("moduleType = lang\n"),
        Err(ModuleError::MissingName)
    ));
}

#[test]
fn test_illegal_name_fails() {
    assert!(matches!(
        parse_manifest("name = b@d\nmoduleType = lang\n"),
        Err(ModuleError::IllegalName { name }) if name == "b@d"
    ));
}

#[test]
fn test_module_type_required_and_known() {
    assert!(matches!(
        parse_manifest("name = a\n"),
        Err(ModuleError::MissingModuleType)
    ));
    assert!(matches!(
        parse_manifest("name = a\nmoduleType = jar\n"),
        Err(ModuleError::UnknownModuleType { module_type }) if module_type == "jar"
    ));
}

#[test]
fn test_native_requires_entry_point() {
    assert!(matches!(
        parse_manifest("name = a\nmoduleType = native\n"),
        Err(ModuleError::MissingEntryPoint { .. })
    ));
}

#[test]
fn test_malformed_line_names_the_line() {
    let err = parse_manifest("name = a\nmoduleType=lang\n").unwrap_err();
    assert!(matches!(
        &err,
        ModuleError::InvalidConfiguration { line } if line == "moduleType=lang"
    ));
    assert!(err.to_string().contains("moduleType=lang"));
    assert!(matches!(
        parse_manifest("name = a = b\nmoduleType = lang\n"),
        Err(ModuleError::InvalidConfiguration { .. })
    ));
}

#[test]
fn test_comments_blank_lines_and_optional_keys() {
    let text = "\
# demo module
name = demo   # trailing comment

description = A demo
version = v1.2.0
minSupportedVersion = v1.0.0
maxSupportedVersion = v2.0.0
supportedImplementations = langJava, langRS ,
moduleType = lang
futureKey = ignored
";
    let manifest = parse_manifest(text).unwrap();
    assert_eq!(manifest.name(), "demo");
    assert_eq!(manifest.description(), Some("A demo"));
    assert_eq!(manifest.version(), Some("v1.2.0"));
    assert_eq!(
        manifest.supported_implementations(),
        Some(&["langJava".to_string(), "langRS".to_string()][..])
    );
    assert_eq!(manifest.module_type(), ModuleType::Lang);
}

#[test]
fn test_compatibility_checks() {
    let text = "name = m\nmoduleType = lang\n\
                minSupportedVersion = v1.1.0\nsupportedImplementations = langRS\n";
    let manifest = parse_manifest(text).unwrap();
    assert!(manifest
        .check_compatibility(LangVersion::new(1, 1, 0), "langRS")
        .is_ok());
    assert!(matches!(
        manifest.check_compatibility(LangVersion::new(1, 0, 9), "langRS"),
        Err(ModuleError::UnsupportedVersion { .. })
    ));
    assert!(matches!(
        manifest.check_compatibility(LangVersion::new(1, 2, 0), "langJava"),
        Err(ModuleError::UnsupportedImplementation { .. })
    ));

    let broken = parse_manifest("name = m\nmoduleType = lang\nmaxSupportedVersion = soon\n")
        .unwrap();
    assert!(matches!(
        broken.check_compatibility(LangVersion::new(1, 0, 0), "langRS"),
        Err(ModuleError::InvalidVersion { .. })
    ));
}
