use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Row, Table};
use formula::functions::ArgumentSpec;
use formula::parser::render;
use formula::{AstNode, Environment, Token, Value};

enum LineType {
    Middle,
    Last,
}

impl LineType {
    fn format_line(&self, base_prefix: &str, content: &str) -> String {
        let symbol = match self {
            LineType::Middle => "├─",
            LineType::Last => "└─",
        };
        format!("{}{} {}\n", base_prefix, symbol, content)
    }

    fn child_prefix(&self, base_prefix: &str) -> String {
        match self {
            LineType::Middle => format!("{}│  ", base_prefix),
            LineType::Last => format!("{}   ", base_prefix),
        }
    }
}

pub struct Formatter {}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter {
    pub fn new() -> Self {
        Self {}
    }

    /// Strings are quoted so they stand apart from numbers and booleans
    pub fn format_value(&self, value: &Value) -> String {
        match value {
            Value::String(s) => format!("{:?}", s),
            other => other.to_string(),
        }
    }

    pub fn format_tokens(&self, tokens: &[Token], rpn: &[Token]) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(Row::from(vec![
            Cell::new("#").set_alignment(CellAlignment::Right),
            Cell::new("Token").set_alignment(CellAlignment::Left),
            Cell::new("Type").set_alignment(CellAlignment::Left),
            Cell::new("Start").set_alignment(CellAlignment::Right),
            Cell::new("Length").set_alignment(CellAlignment::Right),
        ]));

        for (index, token) in tokens.iter().enumerate() {
            table.add_row(Row::from(vec![
                Cell::new(index).set_alignment(CellAlignment::Right),
                Cell::new(&token.text),
                Cell::new(format!("{:?}", token.token_type())),
                Cell::new(token.span.start).set_alignment(CellAlignment::Right),
                Cell::new(token.span.length).set_alignment(CellAlignment::Right),
            ]));
        }

        format!("{}\nRPN: {}\n", table, render(rpn))
    }

    pub fn format_functions(&self, environment: &Environment) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(Row::from(vec![
            Cell::new("Function").set_alignment(CellAlignment::Left),
            Cell::new("Extension").set_alignment(CellAlignment::Left),
            Cell::new("Arguments").set_alignment(CellAlignment::Left),
        ]));

        for function in environment.functions() {
            let arguments: Vec<String> = function
                .signature
                .arguments
                .iter()
                .map(format_argument)
                .collect();
            table.add_row(Row::from(vec![
                function.signature.name.clone(),
                function.extension.name().to_string(),
                arguments.join(", "),
            ]));
        }

        table.to_string()
    }

    /// Draw the expression tree, one node per line
    pub fn format_ast(&self, root: &AstNode) -> String {
        let mut output = format!("{}\n", node_text(root));
        self.format_children(root, "", &mut output);
        output
    }

    fn format_children(&self, node: &AstNode, prefix: &str, output: &mut String) {
        let count = node.children.len();
        for (i, child) in node.children.iter().enumerate() {
            let line = if i + 1 == count {
                LineType::Last
            } else {
                LineType::Middle
            };
            output.push_str(&line.format_line(prefix, &node_text(child)));
            self.format_children(child, &line.child_prefix(prefix), output);
        }
    }
}

fn node_text(node: &AstNode) -> String {
    match &node.value {
        Some(_) if node.children.is_empty() => node.label.clone(),
        Some(value) => format!("{} = {}", node.label, Formatter::new().format_value(value)),
        None => format!("{} (not evaluated)", node.label),
    }
}

fn format_argument(spec: &ArgumentSpec) -> String {
    let name = match (spec.repeat, spec.optional) {
        (Some(repeat), _) => match repeat.max {
            Some(max) => format!("{}[{}..{}]", spec.name, repeat.min, max),
            None => format!("{}[{}..]", spec.name, repeat.min),
        },
        (None, true) => format!("{}?", spec.name),
        (None, false) => spec.name.clone(),
    };
    format!("{}: {}", name, spec.types.describe())
}

#[cfg(test)]
mod tests {
    use super::*;
    use formula::{DataTypes, Engine};

    #[test]
    fn test_value_display() {
        let formatter = Formatter::new();
        assert_eq!(formatter.format_value(&Value::Number(2.5)), "2.5");
        assert_eq!(formatter.format_value(&Value::from("hi")), "\"hi\"");
        assert_eq!(formatter.format_value(&Value::Boolean(false)), "false");
    }

    #[test]
    fn test_ast_tree() {
        let compiled = Engine::new().compile("1 + 2 * 3").unwrap();
        let tree = Formatter::new().format_ast(&compiled.ast(None).unwrap());
        assert_eq!(tree, "+ = 7\n├─ 1\n└─ * = 6\n   ├─ 2\n   └─ 3\n");
    }

    #[test]
    fn test_ast_tree_marks_skipped_branch() {
        let compiled = Engine::new().compile("true ? 1 : 2 + 3").unwrap();
        let tree = Formatter::new().format_ast(&compiled.ast(None).unwrap());
        assert!(tree.contains("└─ + (not evaluated)"), "{}", tree);
        assert!(tree.contains("   ├─ 2 (not evaluated)"), "{}", tree);
    }

    #[test]
    fn test_token_table() {
        let compiled = Engine::new().compile("max(1, 2)").unwrap();
        let output = Formatter::new().format_tokens(compiled.tokens(), compiled.rpn());
        assert!(output.contains("Function"));
        assert!(output.contains("OpeningParen"));
        assert!(output.ends_with("RPN: 1 2 max/2\n"));
    }

    #[test]
    fn test_argument_rendering() {
        assert_eq!(
            format_argument(&ArgumentSpec::optional("digits", DataTypes::NUMBER)),
            "digits?: number"
        );
        assert_eq!(
            format_argument(&ArgumentSpec::repeated("values", DataTypes::ANY, 1, None)),
            "values[1..]: any value"
        );
    }

    #[test]
    fn test_function_table_lists_builtins() {
        let output = Formatter::new().format_functions(Engine::new().environment());
        assert!(output.contains("days_between"));
        assert!(output.contains("math"));
        assert!(output.contains("value: number"));
    }
}
