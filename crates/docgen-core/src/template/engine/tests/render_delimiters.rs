//! Custom delimiter tests

use super::helpers::simple_details;
use super::*;
use serde_json::json;

fn hello_details() -> Details {
    Details::from_value(json!({ "name": "alice" })).unwrap()
}

#[test]
fn test_hash_bang_delimiters() {
    let engine = TemplateEngine::new(Delimiters::new("#!", "!#"), MissingKeyPolicy::Error).unwrap();
    let template = b"\\documentclass{article}\n\\begin{document}\nHello, #!.name!#!\n\\end{document}\n";
    let output = engine.render(template, &hello_details()).unwrap();
    assert_eq!(
        output,
        b"\\documentclass{article}\n\\begin{document}\nHello, alice!\n\\end{document}\n".to_vec()
    );
}

#[test]
fn test_default_braces_are_plain_text_with_custom_delimiters() {
    let engine = TemplateEngine::new(Delimiters::new("<%", "%>"), MissingKeyPolicy::Error).unwrap();
    let output = engine
        .render(b"{{title}} <%title%>", &simple_details())
        .unwrap();
    assert_eq!(output, b"{{title}} My Title");
}

#[test]
fn test_identical_left_and_right_delimiters() {
    let engine = TemplateEngine::new(Delimiters::new("@@", "@@"), MissingKeyPolicy::Error).unwrap();
    let output = engine
        .render(b"@@title@@ and @@count@@", &simple_details())
        .unwrap();
    assert_eq!(output, b"My Title and 42");
}

#[test]
fn test_multibyte_delimiters() {
    let engine = TemplateEngine::new(Delimiters::new("«‹", "›»"), MissingKeyPolicy::Error).unwrap();
    let output = engine
        .render("«‹title›»".as_bytes(), &simple_details())
        .unwrap();
    assert_eq!(output, b"My Title");
}

#[test]
fn test_invalid_delimiters_rejected_before_render() {
    let result = TemplateEngine::new(Delimiters::new("#", "!#"), MissingKeyPolicy::Error);
    assert!(matches!(result, Err(TemplateError::InvalidOptions { .. })));

    let result = render(
        b"no placeholders at all",
        &simple_details(),
        &Delimiters::new("  ", "!#"),
        MissingKeyPolicy::Zero,
    );
    assert!(matches!(result, Err(TemplateError::InvalidOptions { .. })));
}
