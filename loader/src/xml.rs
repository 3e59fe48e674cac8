//! XML grammar documents.
//!
//! ```xml
//! <grammar>
//!   <command name='list' is_default='true'>
//!     <option name='filespec' required='true' default-value='*.csv' />
//!   </command>
//!   <option name='--repeat' is_flag='true' />
//! </grammar>
//! ```
//!
//! `command` and `option` element names match case-insensitively. A single
//! wrapping element of any other name is skipped, and `option` elements
//! directly inside it are global. Attributes may use `_` or `-`; when both
//! are present the `-` spelling wins. Other child elements of a `command`
//! are ignored.

use command_grammar_core::{CommandSpec, GrammarDocument, OptionSpec};
use roxmltree::{Document, Node};

use crate::error::{LoadError, Result};

fn is_named(node: &Node<'_, '_>, name: &str) -> bool {
    node.is_element() && node.tag_name().name().eq_ignore_ascii_case(name)
}

fn element_error(node: &Node<'_, '_>, message: String) -> LoadError {
    let pos = node.document().text_pos_at(node.range().start);
    LoadError::XmlElement {
        line: pos.row,
        column: pos.col,
        message,
    }
}

fn bool_attribute(node: &Node<'_, '_>, name: &str, fallback: bool) -> Result<bool> {
    let Some(raw) = node.attribute(name) else {
        return Ok(fallback);
    };
    let value = raw.trim();
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(element_error(
            node,
            format!("invalid value for attribute {name}: must be 'true' or 'false'"),
        ))
    }
}

/// Reads `name`, then lets its `-` spelling override it.
fn either_spelling(node: &Node<'_, '_>, name: &str) -> Result<bool> {
    let value = bool_attribute(node, name, false)?;
    bool_attribute(node, &name.replace('_', "-"), value)
}

fn option(node: &Node<'_, '_>) -> Result<OptionSpec> {
    let mut spec = OptionSpec::new(node.attribute("name").unwrap_or_default());
    spec.required = bool_attribute(node, "required", false)?;
    spec.allow_multiple = either_spelling(node, "allow_multiple")?;
    spec.is_flag = either_spelling(node, "is_flag")?;
    spec.default_value = node
        .attribute("default-value")
        .or_else(|| node.attribute("default_value"))
        .map(str::to_string);
    Ok(spec)
}

fn command(node: &Node<'_, '_>) -> Result<CommandSpec> {
    let mut spec = CommandSpec::new(node.attribute("name").unwrap_or_default());
    spec.is_default = either_spelling(node, "is_default")?;
    spec.allow_multiple = either_spelling(node, "allow_multiple")?;
    for child in node.children().filter(|c| is_named(c, "option")) {
        spec.options.push(option(&child)?);
    }
    Ok(spec)
}

/// Parses an XML grammar into a document without validating it.
pub(crate) fn parse_xml(text: &str) -> Result<GrammarDocument> {
    let xml = Document::parse(text)?;
    let root = xml.root_element();

    let wrapped = !is_named(&root, "command")
        && !is_named(&root, "option")
        && root.children().any(|c| c.is_element());
    let nodes: Vec<Node<'_, '_>> = if wrapped {
        root.children().filter(Node::is_element).collect()
    } else {
        vec![root]
    };

    let mut document = GrammarDocument::new();
    for node in &nodes {
        if is_named(node, "command") {
            document.commands.push(command(node)?);
        } else if is_named(node, "option") {
            document.options.push(option(node)?);
        } else {
            return Err(element_error(
                node,
                format!("invalid element name '{}'", node.tag_name().name()),
            ));
        }
    }
    Ok(document)
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn option_element(spec: &OptionSpec, indent: &str) -> String {
    let mut line = format!("{indent}<option name=\"{}\"", escape(&spec.name));
    if spec.required {
        line.push_str(" required=\"true\"");
    }
    if let Some(default) = &spec.default_value {
        line.push_str(&format!(" default_value=\"{}\"", escape(default)));
    }
    if spec.allow_multiple {
        line.push_str(" allow_multiple=\"true\"");
    }
    if spec.is_flag {
        line.push_str(" is_flag=\"true\"");
    }
    line.push_str(" />\n");
    line
}

/// Renders a document as XML wrapped in a `<grammar>` element.
pub(crate) fn to_xml(document: &GrammarDocument) -> String {
    let mut out = String::from("<grammar>\n");
    for command in &document.commands {
        out.push_str(&format!("  <command name=\"{}\"", escape(&command.name)));
        if command.is_default {
            out.push_str(" is_default=\"true\"");
        }
        if command.allow_multiple {
            out.push_str(" allow_multiple=\"true\"");
        }
        if command.options.is_empty() {
            out.push_str(" />\n");
            continue;
        }
        out.push_str(">\n");
        for option in &command.options {
            out.push_str(&option_element(option, "    "));
        }
        out.push_str("  </command>\n");
    }
    for option in &document.options {
        out.push_str(&option_element(option, "  "));
    }
    out.push_str("</grammar>\n");
    out
}
