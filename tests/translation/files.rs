#[cfg(test)]
mod verify {
    use std::fs;

    use xilize::language::ExitCode;
    use xilize::problem::Severity;
    use xilize::translation::{Engine, Mode};

    #[test]
    fn include_reads_relative_to_the_including_file() {
        let dir = tempfile::tempdir().expect("temporary directory");
        fs::write(dir.path().join("part.xil"), "define. colour green\n\np. From the part.\n")
            .unwrap();
        let main = dir
            .path()
            .join("main.xil");
        fs::write(&main, "include. part.xil\n\np. The colour is ${colour}.\n").unwrap();

        let engine = Engine::new().with_mode(Mode::Fragment);
        let outcome = engine
            .translate_file(&main)
            .unwrap();

        assert_eq!(outcome.code, ExitCode::Okay);
        assert_eq!(
            outcome.output,
            "<p>From the part.</p>\n\n<p>The colour is green.</p>\n\n"
        );
    }

    #[test]
    fn diagnostics_name_the_included_file() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let part = dir
            .path()
            .join("part.xil");
        fs::write(&part, "\n\ndiv. lonely\n").unwrap();
        let main = dir
            .path()
            .join("main.xil");
        fs::write(&main, "include. part.xil\n").unwrap();

        let engine = Engine::new().with_mode(Mode::Fragment);
        let outcome = engine
            .translate_file(&main)
            .unwrap();

        let errors: Vec<_> = outcome
            .problems
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, part);
        assert_eq!(errors[0].line, 3);
    }

    #[test]
    fn self_inclusion_is_stopped() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let main = dir
            .path()
            .join("loop.xil");
        fs::write(&main, "include. loop.xil\n\np. text\n").unwrap();

        let engine = Engine::new().with_mode(Mode::Fragment);
        let outcome = engine
            .translate_file(&main)
            .unwrap();

        assert_eq!(outcome.code, ExitCode::Error);
        let errors = outcome
            .problems
            .messages(Severity::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("includes nested too deeply"));
    }

    #[test]
    fn raw_inclusion_is_verbatim() {
        let dir = tempfile::tempdir().expect("temporary directory");
        fs::write(dir.path().join("snippet.html"), "<em>*kept*</em>").unwrap();
        let main = dir
            .path()
            .join("main.xil");
        fs::write(&main, "includeRaw. snippet.html\n").unwrap();

        let engine = Engine::new().with_mode(Mode::Fragment);
        let outcome = engine
            .translate_file(&main)
            .unwrap();
        assert_eq!(outcome.output, "<em>*kept*</em>\n\n");
    }

    #[test]
    fn property_files_define_keys() {
        let dir = tempfile::tempdir().expect("temporary directory");
        fs::write(
            dir.path()
                .join("keys.toml"),
            "colour = \"red\"\n\n[size]\nwidth = 3\n",
        )
        .unwrap();
        let main = dir
            .path()
            .join("main.xil");
        fs::write(&main, "propfile. keys.toml\n\np. ${colour} ${size.width}\n").unwrap();

        let engine = Engine::new().with_mode(Mode::Fragment);
        let outcome = engine
            .translate_file(&main)
            .unwrap();
        assert_eq!(outcome.output, "<p>red 3</p>\n\n");
    }

    #[test]
    fn configuration_is_loaded() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let config = dir
            .path()
            .join("xilize.toml");
        fs::write(&config, "author = \"Ada\"\n_IdPrefix_ = \"sec\"\n").unwrap();

        let mut engine = Engine::new().with_mode(Mode::Fragment);
        engine
            .configure(&config)
            .unwrap();
        assert_eq!(engine.value("author"), "Ada");
        assert!(engine
            .value("_XilizeConfigFile_")
            .ends_with("xilize.toml"));

        let outcome = engine.translate_str(
            &dir.path()
                .join("doc.xil"),
            "p. by ${author}\n",
        );
        assert_eq!(outcome.output, "<p>by Ada</p>\n\n");
    }

    #[test]
    fn malformed_configuration_is_rejected() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let config = dir
            .path()
            .join("broken.toml");
        fs::write(&config, "this is = = not toml").unwrap();

        let mut engine = Engine::new();
        assert!(engine
            .configure(&config)
            .is_err());
    }

    #[test]
    fn natural_pages_include_header_and_footer() {
        let dir = tempfile::tempdir().expect("temporary directory");
        fs::write(dir.path().join("header.xil"), "p(top). Site header\n").unwrap();
        fs::write(dir.path().join("footer.xil"), "p(bottom). Site footer\n").unwrap();
        let main = dir
            .path()
            .join("page.xil");
        fs::write(&main, "Page title\n\np. Content\n").unwrap();

        let mut engine = Engine::new();
        engine.define("headerinc", "header.xil");
        engine.define("footerinc", "footer.xil");
        let outcome = engine
            .translate_file(&main)
            .unwrap();

        assert_eq!(outcome.code, ExitCode::Okay);
        let output = outcome.output;
        let header = output
            .find("Site header")
            .unwrap();
        let title = output
            .find("<h1>Page title</h1>")
            .unwrap();
        let footer = output
            .find("Site footer")
            .unwrap();
        assert!(header < title && title < footer);
        assert!(output.contains("<title>Page title</title>"));
    }
}
