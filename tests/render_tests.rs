//! End-to-end rendering scenarios through the facade crate.

use std::fs;

use stencil::{Template, TemplateError, TemplateLoader, Value};

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_variables_and_repeated_blocks() -> TestResult {
    init_logging();

    let mut tpl = Template::from_source(concat!(
        "<html><body><h1>{$page_title}</h1><div id=\"ads\">",
        "{block:ad}<div class=\"ad\">{$ad_content}</div>{end}",
        "</div></body></html>",
    ))?;
    tpl.set("page_title", "Some title");
    for ad in ["Some ad", "Another ad", "More ads"] {
        tpl.add("ad").set("ad_content", ad);
    }

    assert_eq!(
        tpl.render()?,
        concat!(
            "<html><body><h1>Some title</h1><div id=\"ads\">",
            "<div class=\"ad\">Some ad</div>",
            "<div class=\"ad\">Another ad</div>",
            "<div class=\"ad\">More ads</div>",
            "</div></body></html>",
        )
    );
    Ok(())
}

#[test]
fn test_block_without_data_renders_nothing() -> TestResult {
    init_logging();

    let mut tpl = Template::from_source("start{block:ad}<p>{$ad_content}</p>{end}finish")?;
    tpl.set("unused", "x");

    assert_eq!(tpl.render()?, "startfinish");
    Ok(())
}

#[test]
fn test_block_scope_sees_ancestor_variables() -> TestResult {
    init_logging();

    let mut tpl = Template::from_source("{block:row}{$prefix}{$item}{end}")?;
    tpl.set("prefix", "- ");
    tpl.add("row").set("item", "one");
    tpl.add("row").set("item", "two");

    assert_eq!(tpl.render()?, "- one- two");
    Ok(())
}

#[test]
fn test_nested_blocks() -> TestResult {
    init_logging();

    let mut tpl = Template::from_source(
        "{block:section}<h2>{$heading}</h2>{block:item}<li>{$label}</li>{end}{end}",
    )?;
    let section = tpl.add("section").set("heading", "First");
    section.add("item").set("label", "a");
    let section = tpl.add("section").set("heading", "Second");
    section.add("item").set("label", "b");

    assert_eq!(
        tpl.render()?,
        "<h2>First</h2><li>a</li><h2>Second</h2><li>b</li>"
    );
    Ok(())
}

#[test]
fn test_rendering_is_idempotent() -> TestResult {
    init_logging();

    let mut tpl = Template::from_source("{$greeting}{block:x}!{end}")?;
    tpl.set("greeting", "hi");
    tpl.add("x");
    tpl.add("x");

    let first = tpl.render()?;
    let second = tpl.render()?;
    assert_eq!(first, "hi!!");
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_data_populated_from_json() -> TestResult {
    init_logging();

    let mut tpl = Template::from_source("{$user.name} ({$user.city})")?;
    tpl.set(
        "user",
        Value::from(serde_json::json!({ "name": "Alice", "city": "Wonderland" })),
    );

    assert_eq!(tpl.render()?, "Alice (Wonderland)");
    Ok(())
}

#[test]
fn test_escaped_and_raw_output() -> TestResult {
    init_logging();

    let mut tpl = Template::from_source("{$content} vs {$$content}")?;
    tpl.set("content", "<script>");

    assert_eq!(tpl.render()?, "&lt;script&gt; vs <script>");
    Ok(())
}

#[test]
fn test_custom_function_and_constant() -> TestResult {
    init_logging();

    fn shout(value: Value) -> Value {
        Value::Str(format!("{}!", value))
    }

    let mut tpl = Template::from_source("{shout($name)} of {SITE_NAME}")?;
    tpl.set("name", "echo");
    tpl.functions_mut().register("shout", shout);
    tpl.constants_mut().define("SITE_NAME", "Example");

    assert_eq!(tpl.render()?, "echo! of Example");
    Ok(())
}

#[test]
fn test_unknown_variable_aborts_render() -> TestResult {
    init_logging();

    let tpl = Template::from_source("before {$missing} after")?;
    let error = tpl.render().unwrap_err();
    assert!(matches!(error, TemplateError::Expression(_)));
    Ok(())
}

#[test]
fn test_load_and_render_from_include_path() -> TestResult {
    init_logging();

    let dir = tempfile::tempdir()?;
    fs::write(
        dir.path().join("page.tpl"),
        "Hello {$name}{block:ad} [{$ad_content}]{end}",
    )?;

    let loader = TemplateLoader::with_root(dir.path())?;
    let mut tpl = loader.load("page")?;
    tpl.set("name", "World");
    tpl.add("ad").set("ad_content", "Some ad");

    assert_eq!(tpl.render()?, "Hello World [Some ad]");
    assert_eq!(tpl.path(), Some(dir.path().join("page.tpl").as_path()));
    Ok(())
}

#[test]
fn test_parse_error_reports_file_and_line() -> TestResult {
    init_logging();

    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("broken.tpl"), "line one\n{end}")?;

    let loader = TemplateLoader::with_root(dir.path())?;
    let error = loader.load("broken").unwrap_err();
    let (file, line, message) = match error {
        TemplateError::Parse { file, line, message } => (file, line, message),
        other => panic!("expected a parse error, got {other}"),
    };
    assert!(file.ends_with("broken.tpl"));
    assert_eq!(line, 2);
    assert_eq!(message, "unexpected {end}");
    Ok(())
}
