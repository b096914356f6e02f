#[cfg(test)]
mod samples {
    use std::fs;
    use std::path::Path;

    use xilize::parsing;
    use xilize::translation::{Engine, Mode};

    #[test]
    fn ensure_samples_translate() {
        let dir = Path::new("tests/samples/");

        assert!(dir.exists(), "samples directory missing");

        let entries = fs::read_dir(dir).expect("Failed to read samples directory");

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.expect("Failed to read directory entry");
            let path = entry.path();

            if path
                .extension()
                .and_then(|s| s.to_str())
                == Some("xil")
            {
                files.push(path);
            }
        }

        assert!(!files.is_empty(), "No .xil files found in samples directory");

        let mut failures = Vec::new();

        for mode in [Mode::Page, Mode::Fragment] {
            let engine = Engine::new().with_mode(mode);
            for file in &files {
                let content = parsing::load(file)
                    .unwrap_or_else(|e| panic!("Failed to load file {:?}: {:?}", file, e));

                let outcome = engine.translate_str(file, &content);
                if outcome
                    .problems
                    .errors()
                    > 0
                {
                    for diagnostic in outcome
                        .problems
                        .iter()
                    {
                        println!("{:?}: {}", file, diagnostic.message);
                    }
                    failures.push(file.clone());
                }
            }
        }

        if !failures.is_empty() {
            panic!(
                "Sample files should translate without errors, but {} files failed",
                failures.len()
            );
        }
    }
}
