#![allow(clippy::unwrap_used)]

use std::fs;

use super::*;
use crate::config::{ArrangeConfiguration, ConfigurationElement, ElementConfiguration, SortBy, SortDirection};
use crate::condition::ElementAttribute;
use crate::elements::ElementType;

fn sorted_types() -> Arranger {
    let config = ArrangeConfiguration::new(vec![ConfigurationElement::element(
        ElementConfiguration::new(ElementType::Type)
            .with_sort_by(SortBy::new(ElementAttribute::Name, SortDirection::Ascending)),
    )]);
    Arranger::new(&config).unwrap()
}

fn names(elements: &[CodeElement]) -> Vec<&str> {
    elements.iter().map(|e| e.name.as_str()).collect()
}

#[test]
fn test_arrange_sources_keeps_input_order_and_isolates_failures() {
    let sources = vec![
        SourceFile::new("B.cs", "class B { }\nclass A { }\n"),
        SourceFile::new("Broken.cs", "class C {\n"),
        SourceFile::new("notes.txt", "hello"),
        SourceFile::new("D.vb", "Class Y\nEnd Class\nClass X\nEnd Class\n"),
    ];
    let results = arrange_sources(&sorted_types(), &ParserOptions::default(), &sources);
    assert_eq!(results.len(), 4);

    let first = results[0].as_ref().unwrap();
    assert_eq!(first.language, Language::CSharp);
    assert_eq!(names(&first.elements), ["A", "B"]);

    let Err(Error::Syntax { path, source }) = &results[1] else {
        panic!("expected a syntax error");
    };
    assert_eq!(path, &PathBuf::from("Broken.cs"));
    assert_eq!(source.message, "expected '}'");

    assert!(matches!(&results[2], Err(Error::UnsupportedLanguage { .. })));

    let last = results[3].as_ref().unwrap();
    assert_eq!(last.language, Language::VisualBasic);
    assert_eq!(names(&last.elements), ["X", "Y"]);
}

#[test]
fn test_arrange_directory_reads_supported_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    fs::write(dir.path().join("Second.cs"), "class Zeta { }\nclass Alpha { }\n").unwrap();
    fs::write(dir.path().join("nested").join("First.vb"), "Module M\nEnd Module\n").unwrap();
    fs::write(dir.path().join("README.md"), "# readme").unwrap();

    let paths = collect_source_files(dir.path()).unwrap();
    assert_eq!(paths.len(), 2);
    assert!(paths[0].ends_with("Second.cs"));
    assert!(paths[1].ends_with("nested/First.vb"));

    let results = arrange_directory(&sorted_types(), &ParserOptions::default(), dir.path()).unwrap();
    let arranged: Vec<ArrangedFile> = results.into_iter().map(|r| r.unwrap()).collect();
    assert_eq!(names(&arranged[0].elements), ["Alpha", "Zeta"]);
    assert_eq!(names(&arranged[1].elements), ["M"]);
}

#[test]
fn test_missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("Gone.cs");
    let results = arrange_files(&sorted_types(), &ParserOptions::default(), &[missing.clone()]);
    let Err(err) = &results[0] else {
        panic!("expected an error");
    };
    assert!(matches!(err, Error::Io { .. }));
    assert_eq!(err.path(), Some(missing.as_path()));
}

#[test]
fn test_read_only_files_carry_the_attribute() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Locked.cs");
    fs::write(&path, "class Locked { }").unwrap();
    let mut permissions = fs::metadata(&path).unwrap().permissions();
    permissions.set_readonly(true);
    fs::set_permissions(&path, permissions).unwrap();

    let source = read_source(&path).unwrap();
    assert_eq!(source.attributes, ["ReadOnly"]);

    let config = ArrangeConfiguration::new(vec![ConfigurationElement::element(
        ElementConfiguration::any().with_filter("!($(File.Attributes) : 'ReadOnly')"),
    )]);
    let arranged = arrange_source(
        &Arranger::new(&config).unwrap(),
        &ParserOptions::default(),
        &source,
    )
    .unwrap();
    assert!(arranged.elements.is_empty());
}
