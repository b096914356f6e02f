#[cfg(test)]
mod verify {
    use std::path::{Path, PathBuf};
    use std::sync::atomic::Ordering;

    use xilize::language::{ExitCode, TranslationError};
    use xilize::problem::Severity;
    use xilize::translation::{Engine, Mode};

    #[test]
    fn page_has_prolog_and_epilog() {
        let engine = Engine::new();
        let outcome = engine.translate_str(Path::new("page.xil"), "Title here\n\np. Body text\n");

        assert_eq!(outcome.code, ExitCode::Okay);
        let output = outcome.output;
        assert!(output.starts_with(
            "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Strict//EN\""
        ));
        assert!(output.contains("  <title>Title here</title>\n"));
        assert!(output.contains("<body>\n\n<h1>Title here</h1>\n\n<p>Body text</p>\n\n"));
        assert!(output.ends_with("</body>\n</html>\n\n\n"));
    }

    #[test]
    fn natural_labelling_can_be_turned_off() {
        let mut engine = Engine::new();
        engine.define("_Natural_", "false");
        let outcome = engine.translate_str(Path::new("page.xil"), "Title here\n");

        assert!(outcome
            .output
            .contains("<p>Title here</p>"));
        assert!(!outcome
            .output
            .contains("<title>"));
    }

    #[test]
    fn natural_signature_is_configurable() {
        let mut engine = Engine::new();
        engine.define("_NaturalSig_", "h2");
        let outcome = engine.translate_str(Path::new("page.xil"), "Label\n\np. text\n");
        assert!(outcome
            .output
            .contains("<h2>Label</h2>"));
    }

    #[test]
    fn fragment_mode_has_no_page() {
        let engine = Engine::new().with_mode(Mode::Fragment);
        let outcome = engine.translate_str(Path::new("part.xil"), "Title here\n\nh2. Heading\n");

        assert_eq!(
            outcome.output,
            "<p>Title here</p>\n\n<h2>Heading</h2>\n\n"
        );
    }

    #[test]
    fn document_title_overrides_label() {
        let engine = Engine::new();
        let outcome = engine.translate_str(
            Path::new("page.xil"),
            "define. title Chosen\n\nLabel\n",
        );
        assert!(outcome
            .output
            .contains("<title>Chosen</title>"));
        assert!(outcome
            .output
            .contains("<h1>Label</h1>"));
    }

    #[test]
    fn prolog_can_be_suppressed() {
        let mut engine = Engine::new().with_mode(Mode::Page);
        engine.define("prolog", "false");
        engine.define("epilog", "false");
        let outcome = engine.translate_str(Path::new("page.xil"), "h2. Only\n");
        assert_eq!(outcome.output, "\n\n<h2>Only</h2>\n\n\n\n");
    }

    #[test]
    fn body_attributes_reach_the_prolog() {
        let engine = Engine::new();
        let outcome = engine.translate_str(Path::new("page.xil"), "body(wide).\n\nh2. Content\n");
        assert!(outcome
            .output
            .contains("<body class=\"wide\">"));
    }

    #[test]
    fn errors_set_the_exit_code() {
        let engine = Engine::new().with_mode(Mode::Fragment);
        let outcome = engine.translate_str(Path::new("bad.xil"), "div. lonely\n");
        assert_eq!(outcome.code, ExitCode::Error);
        assert_eq!(
            outcome
                .problems
                .errors(),
            1
        );
    }

    #[test]
    fn deep_nesting_is_reported() {
        let engine = Engine::new().with_mode(Mode::Fragment);
        let source = format!("{}p. x\n{}", "div. {{\n".repeat(1000), "}}\n".repeat(1000));
        let outcome = engine.translate_str(Path::new("deep.xil"), &source);
        assert_eq!(outcome.code, ExitCode::Error);
        assert!(outcome
            .problems
            .messages(Severity::Error)
            .contains(&"blocks nested more than 128 levels deep"));
    }

    #[test]
    fn clean_unit_has_no_diagnostics() {
        let engine = Engine::new().with_mode(Mode::Fragment);
        let outcome = engine.translate_str(Path::new("clean.xil"), "p. Nothing to say.\n");
        assert_eq!(outcome.code, ExitCode::Okay);
        assert!(outcome
            .problems
            .messages(Severity::Report)
            .is_empty());
    }

    #[test]
    fn file_keys_are_defined() {
        let engine = Engine::new().with_mode(Mode::Fragment);
        let outcome = engine.translate_str(
            Path::new("notes.xil"),
            "p. ${_FileNameXil_} becomes ${_FileNameHtml_}\n",
        );
        assert_eq!(
            outcome.output,
            "<p>notes.xil becomes notes.html</p>\n\n"
        );
    }

    #[test]
    fn definitions_apply_to_every_unit() {
        let mut engine = Engine::new().with_mode(Mode::Fragment);
        engine.define("site", "Example");

        for name in ["one.xil", "two.xil"] {
            let outcome = engine.translate_str(Path::new(name), "p. ${site}\n");
            assert_eq!(outcome.output, "<p>Example</p>\n\n");
        }
    }

    #[test]
    fn units_do_not_leak_definitions() {
        let engine = Engine::new().with_mode(Mode::Fragment);
        engine.translate_str(Path::new("one.xil"), "define. colour blue\n");
        let outcome = engine.translate_str(Path::new("two.xil"), "ifndef. colour p. none\n");
        assert_eq!(outcome.output, "<p>none</p>\n\n");
    }

    #[test]
    fn output_paths() {
        let engine = Engine::new();
        assert_eq!(
            engine.output_path(Path::new("docs/guide.xil")),
            PathBuf::from("docs/guide.html")
        );
        assert_eq!(
            engine.output_path(Path::new("notes.txt")),
            PathBuf::from("notes.txt.html")
        );
    }

    #[test]
    fn halted_engine_skips_units() {
        let engine = Engine::new();
        engine
            .halt_flag()
            .store(true, Ordering::SeqCst);
        let result = engine.translate_file(Path::new("never.xil"));
        assert!(matches!(result, Err(TranslationError::Halted)));
    }

    #[test]
    fn missing_file_is_an_io_failure() {
        let engine = Engine::new();
        let result = engine.translate_file(Path::new("/nonexistent/file.xil"));
        match result {
            Err(error) => assert_eq!(error.code(), ExitCode::Io),
            Ok(_) => panic!("expected failure"),
        }
    }

    #[test]
    fn standard_signatures_listed() {
        let names = Engine::new().signature_names();
        for name in ["p", "h1", "bc", "table", "toc", "define", "signature"] {
            assert!(
                names.contains(&name.to_string()),
                "missing {}",
                name
            );
        }
    }
}
