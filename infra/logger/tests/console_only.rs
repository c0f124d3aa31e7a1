use fvgen_logger::{LevelFilter, Logger};

#[test]
fn console_only_logger_writes_no_file() {
    let logger = Logger::builder()
        .name("fvgen-console-only")
        .console(true)
        .level(LevelFilter::INFO)
        .init()
        .expect("logger should initialize");

    assert!(!logger.writes_file(), "console-only logger should not create a file writer");
}
