//! Parse failures as seen through the public API
#![allow(clippy::unwrap_used)]

use rstest::rstest;

use arranger::parser::ErrorCode;
use arranger::project::{SourceFile, arrange_source};
use arranger::{ArrangeConfiguration, Arranger, Error, Language, ParserOptions};

use crate::helpers::{names, parse, parse_err};

#[rstest]
#[case::cs_missing_brace(Language::CSharp, "namespace N\n{\n    class C\n    {\n", ErrorCode::E0202, "expected '}'", (5, 1))]
#[case::cs_stray_brace(Language::CSharp, "}\n", ErrorCode::E0205, "unexpected '}'", (1, 1))]
#[case::vb_missing_end(Language::VisualBasic, "Class C\n    Sub Run()\n    End Sub\n", ErrorCode::E0202, "expected 'End Class'", (4, 1))]
#[case::vb_stray_end(Language::VisualBasic, "End Class\n", ErrorCode::E0205, "unexpected 'End Class'", (1, 1))]
fn test_error_contract(
    #[case] language: Language,
    #[case] source: &str,
    #[case] code: ErrorCode,
    #[case] message: &str,
    #[case] position: (usize, usize),
) {
    let err = parse_err(language, source);
    assert_eq!(err.code, code, "{}", err.format());
    assert_eq!(err.message, message);
    assert_eq!((err.line(), err.column()), position);
}

#[test]
fn test_same_shape_from_both_languages() {
    let cs = parse(
        Language::CSharp,
        "namespace Demo\n{\n    public class Widget\n    {\n        private int count;\n        public void Run() { }\n    }\n}\n",
    );
    let vb = parse(
        Language::VisualBasic,
        "Namespace Demo\n    Public Class Widget\n        Private count As Integer\n        Public Sub Run()\n        End Sub\n    End Class\nEnd Namespace\n",
    );
    for tree in [&cs, &vb] {
        assert_eq!(names(tree), ["Demo"]);
        assert_eq!(names(&tree[0].children), ["Widget"]);
        assert_eq!(names(&tree[0].children[0].children), ["count", "Run"]);
    }
    assert_eq!(
        cs[0].children[0].children[1].element_type(),
        vb[0].children[0].children[1].element_type()
    );
}

#[test]
fn test_syntax_error_names_the_file() {
    let arranger = Arranger::new(&ArrangeConfiguration::standard()).unwrap();
    let source = SourceFile::new("src/Broken.vb", "Class C\nEnd Module\n");
    let err = arrange_source(&arranger, &ParserOptions::default(), &source).unwrap_err();
    let Error::Syntax { source: syntax, .. } = &err else {
        panic!("expected a syntax error, got {err:?}");
    };
    assert_eq!(syntax.code, ErrorCode::E0206);
    let message = err.to_string();
    assert!(message.starts_with("src/Broken.vb: E0206: expected 'End Class'"), "{message}");
    assert_eq!(err.path().unwrap(), std::path::Path::new("src/Broken.vb"));
}
