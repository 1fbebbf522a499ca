//! End-to-end integration tests
//!
//! These tests validate the complete conversion pipeline using predefined
//! fixtures. Each test:
//! 1. Loads config.toml (and template.tmpl, when present) from a fixture directory
//! 2. Converts input.csv with the selected strategy
//! 3. Compares the output with expected.beancount
//!
//! Test fixtures are located in tests/fixtures/ and cover:
//! - A German export with a header block, thousands separators and a signed amount column
//! - A US export with separate credit and debit columns, quoting and a custom template
//! - Overlapping rules, comments and an unparseable date
//!
//! Each test is run twice: once with the sync strategy and once with the async strategy.

#[cfg(test)]
mod tests {
    use csv2beancount::cli::StrategyType;
    use csv2beancount::config::Config;
    use csv2beancount::io::{load_template, Template};
    use csv2beancount::strategy::{create_strategy, BatchConfig, ConvertJob, ConvertStats};
    use csv2beancount::types::ConvertError;
    use rstest::rstest;
    use std::fs;
    use std::io::Write;
    use std::path::Path;
    use tempfile::NamedTempFile;

    /// Helper function to create a temporary CSV file for testing
    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    fn strategy_config(strategy_type: StrategyType) -> Option<BatchConfig> {
        match strategy_type {
            StrategyType::Sync => None,
            // Small batches so fixtures span several of them
            StrategyType::Async => Some(BatchConfig::new(2, 3)),
        }
    }

    /// Run a test fixture by converting input.csv and comparing with expected.beancount
    ///
    /// # Arguments
    ///
    /// * `fixture_name` - Name of the fixture directory (e.g., "ing_diba")
    /// * `strategy_type` - Processing strategy to use (Sync or Async)
    ///
    /// # Panics
    ///
    /// Panics if fixture files cannot be read, the conversion fails, or the
    /// output doesn't match.
    fn run_test_fixture(fixture_name: &str, strategy_type: StrategyType) -> ConvertStats {
        let fixture_dir = Path::new("tests/fixtures").join(fixture_name);
        let input_path = fixture_dir.join("input.csv");
        let expected_path = fixture_dir.join("expected.beancount");
        let template_path = fixture_dir.join("template.tmpl");

        assert!(input_path.exists(), "Input file not found: {}", input_path.display());

        let config = Config::load(Some(fixture_dir.join("config.toml").as_path()))
            .unwrap_or_else(|e| panic!("Failed to load config: {}", e));
        let template = load_template(template_path.exists().then_some(template_path.as_path()));
        let job = ConvertJob::new(config.layout, config.rules, template);

        let strategy = create_strategy(strategy_type, strategy_config(strategy_type));
        let mut output = Vec::new();
        let stats = strategy
            .process(&input_path, &job, &mut output)
            .unwrap_or_else(|e| panic!("Failed to convert: {}", e));

        let actual_output = String::from_utf8(output).expect("Output is not UTF-8");
        let expected_output = fs::read_to_string(&expected_path).unwrap_or_else(|e| {
            panic!("Failed to read expected file {}: {}", expected_path.display(), e)
        });

        assert_eq!(
            actual_output, expected_output,
            "\n\nOutput mismatch for fixture: {} (strategy: {:?})\n\nActual output:\n{}\n\nExpected output:\n{}\n",
            fixture_name, strategy_type, actual_output, expected_output
        );

        stats
    }

    /// End-to-end test for all fixtures with both processing strategies
    #[rstest]
    #[case("ing_diba", 6)]
    #[case("split_columns", 5)]
    fn test_fixtures(
        #[case] fixture: &str,
        #[case] entries: usize,
        #[values(StrategyType::Sync, StrategyType::Async)] strategy: StrategyType,
    ) {
        let stats = run_test_fixture(fixture, strategy);
        assert_eq!(stats, ConvertStats { written: entries, render_failures: 0 });
    }

    #[rstest]
    fn test_unknown_template_field_skips_every_row(
        #[values(StrategyType::Sync, StrategyType::Async)] strategy: StrategyType,
    ) {
        let file = create_temp_csv("2020-01-01;Shop;Food;-1,00\n2020-01-02;Shop;Food;-2,00\n");
        let config = Config::from_toml_str("[csv]\npayee = 1\ndescription = 2\namount_in = 3\namount_out = 3\n")
            .unwrap();
        let job = ConvertJob::new(config.layout, config.rules, Template::parse("{{.Amount}}").unwrap());

        let mut output = Vec::new();
        let stats = create_strategy(strategy, strategy_config(strategy))
            .process(file.path(), &job, &mut output)
            .unwrap();

        assert!(output.is_empty());
        assert_eq!(stats, ConvertStats { written: 0, render_failures: 2 });
    }

    #[rstest]
    fn test_width_mismatch_aborts_the_run(
        #[values(StrategyType::Sync, StrategyType::Async)] strategy: StrategyType,
    ) {
        let file = create_temp_csv("a;b;c;-1,00\na;b;c\n");
        let config = Config::from_toml_str("[csv]\namount_in = 3\namount_out = 3\n").unwrap();
        let job = ConvertJob::new(config.layout, config.rules, Template::default());

        let mut output = Vec::new();
        let err = create_strategy(strategy, strategy_config(strategy))
            .process(file.path(), &job, &mut output)
            .unwrap_err();

        assert_eq!(err, ConvertError::field_count(2, 4, 3));
        assert_eq!(err.to_string(), "Record on line 2 has 3 fields, expected 4");

        let text = String::from_utf8(output).unwrap();
        assert_eq!(text.matches("Assets:Unknown").count(), 1, "got {}", text);
        assert!(text.contains("  Assets:Unknown   -1.00\n"), "got {}", text);
    }

    #[rstest]
    fn test_missing_input_file(
        #[values(StrategyType::Sync, StrategyType::Async)] strategy: StrategyType,
    ) {
        let config = Config::default();
        let job = ConvertJob::new(config.layout, config.rules, Template::default());

        let err = create_strategy(strategy, strategy_config(strategy))
            .process(Path::new("tests/fixtures/missing.csv"), &job, &mut Vec::<u8>::new())
            .unwrap_err();
        assert!(matches!(err, ConvertError::FileNotFound { .. }));
    }
}
