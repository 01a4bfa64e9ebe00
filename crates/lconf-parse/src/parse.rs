use std::path::Path;
use std::sync::LazyLock;

use lconf_value::{Kwarg, Scalar, Section};

use crate::cursor::Cursor;
use crate::error::ParseError;
use crate::scan::{scan_boolean, scan_number, scan_string, scan_word, skip_whitespace};
use crate::trie::ParseTrie;

/// The macro symbol table: identifier to registered substitution text.
///
/// One table exists per root document parse and is threaded by reference
/// through every recursive call, includes too, so a macro defined in one
/// file substitutes in every file parsed later. Redefinition is
/// last-write-wins via trie overwrite.
pub type MacroTable = ParseTrie<String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MacroOp {
    Define,
    Import,
    Include,
    IncludeOptional,
}

static MACROS: LazyLock<ParseTrie<Option<MacroOp>>> = LazyLock::new(|| {
    let mut trie = ParseTrie::default();
    *trie.define("DEFINE").unwrap() = Some(MacroOp::Define);
    *trie.define("IMPORT").unwrap() = Some(MacroOp::Import);
    *trie.define("INCLUDE").unwrap() = Some(MacroOp::Include);
    *trie.define("INCLUDE_OPTIONAL").unwrap() = Some(MacroOp::IncludeOptional);
    trie
});

/// Canonicalize `path` and read the whole file.
fn read_file(path: &Path) -> Result<String, ParseError> {
    let abspath = std::fs::canonicalize(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::read_to_string(&abspath).map_err(|source| ParseError::Io {
        path: abspath,
        source,
    })
}

/// Parse the file at `path` into `section`.
pub fn parse_file(
    section: &mut Section,
    path: impl AsRef<Path>,
    regs: &mut MacroTable,
) -> Result<(), ParseError> {
    let text = read_file(path.as_ref())?;
    parse_str(section, &text, regs)
}

/// Parse in-memory text into `section`.
pub fn parse_str(section: &mut Section, text: &str, regs: &mut MacroTable) -> Result<(), ParseError> {
    let mut cur = Cursor::new(text);
    parse_iterator(section, &mut cur, regs)
}

/// Top-level statement loop for one section scope.
fn parse_iterator(
    section: &mut Section,
    cur: &mut Cursor,
    regs: &mut MacroTable,
) -> Result<(), ParseError> {
    while skip_whitespace(cur, false)? {
        match cur.peek() {
            '@' => parse_macro(section, cur, regs)?,
            ';' => cur.bump(),
            // stray vector closers reaching section scope
            ']' | ')' => cur.bump(),
            '}' => {
                cur.bump();
                return Ok(());
            }
            _ => {
                let name = scan_word(cur)?;
                if let Some(kwarg) = parse_kwarg(section, &name, cur, regs)? {
                    section.insert(name, kwarg);
                }
            }
        }
    }
    Ok(())
}

/// Parse the value half of one `name (=|:) value` assignment.
///
/// Returns `None` when the value was linked in place (nested sections
/// merge into an existing same-named child instead of producing a new
/// entry to insert).
fn parse_kwarg(
    section: &mut Section,
    name: &str,
    cur: &mut Cursor,
    regs: &mut MacroTable,
) -> Result<Option<Kwarg>, ParseError> {
    skip_whitespace(cur, true)?;
    if !matches!(cur.peek(), '=' | ':') {
        return Err(ParseError::Expected {
            expected: '=',
            context: cur.context(),
        });
    }
    cur.bump();
    skip_whitespace(cur, true)?;

    loop {
        match cur.peek() {
            // a macro may prefix the value it precedes
            '@' => {
                parse_macro(section, cur, regs)?;
                skip_whitespace(cur, true)?;
            }
            '\'' | '"' => {
                return Ok(Some(Kwarg::Scalar(Scalar::Text(scan_string(cur, regs)?))));
            }
            '[' | '(' => {
                cur.bump();
                return Ok(Some(Kwarg::Vector(parse_vector(section, cur, regs)?)));
            }
            '{' => {
                cur.bump();
                let child = section.section_entry(name);
                parse_iterator(child, cur, regs)?;
                return Ok(None);
            }
            'T' | 't' | 'F' | 'f' => {
                return Ok(Some(Kwarg::Scalar(Scalar::Bool(scan_boolean(cur)?))));
            }
            _ => return Ok(Some(Kwarg::Scalar(scan_number(cur, regs)?))),
        }
    }
}

/// Parse comma-separated scalar elements up to a `]` or `)`.
///
/// Elements are independently typed scalars; nested sections and vectors
/// are not part of the grammar.
fn parse_vector(
    section: &mut Section,
    cur: &mut Cursor,
    regs: &mut MacroTable,
) -> Result<Vec<Scalar>, ParseError> {
    let mut items = Vec::new();
    loop {
        skip_whitespace(cur, true)?;
        match cur.peek() {
            ']' | ')' => {
                cur.bump();
                return Ok(items);
            }
            ',' => cur.bump(),
            '@' => parse_macro(section, cur, regs)?,
            '\'' | '"' => items.push(Scalar::Text(scan_string(cur, regs)?)),
            'T' | 't' | 'F' | 'f' => items.push(Scalar::Bool(scan_boolean(cur)?)),
            _ => items.push(scan_number(cur, regs)?),
        }
    }
}

/// Dispatch one `@KEYWORD` directive.
fn parse_macro(
    section: &mut Section,
    cur: &mut Cursor,
    regs: &mut MacroTable,
) -> Result<(), ParseError> {
    if cur.peek() != '@' {
        return Err(ParseError::Expected {
            expected: '@',
            context: cur.context(),
        });
    }
    cur.bump();

    let mut op = match MACROS.lookup(cur) {
        Ok(Some(op)) => op,
        _ => {
            return Err(ParseError::InvalidMacro {
                context: cur.window(2, 10),
            });
        }
    };
    // `INCLUDE*` alias: the trie stops on '*' with INCLUDE matched.
    if op == MacroOp::Include && cur.peek() == '*' {
        cur.bump();
        op = MacroOp::IncludeOptional;
    }

    match op {
        MacroOp::Define => parse_define(cur, regs),
        MacroOp::Import => parse_import(cur, regs),
        MacroOp::Include => parse_include(section, cur, regs, false),
        MacroOp::IncludeOptional => parse_include(section, cur, regs, true),
    }
}

/// `@DEFINE name = "text"` — register a substitution variable.
///
/// The text is string-parsed with the same table, so it may reference
/// macros defined earlier.
fn parse_define(cur: &mut Cursor, regs: &mut MacroTable) -> Result<(), ParseError> {
    skip_whitespace(cur, true)?;
    let name = scan_word(cur)?;
    skip_whitespace(cur, true)?;
    if !matches!(cur.peek(), '=' | ':') {
        return Err(ParseError::Expected {
            expected: '=',
            context: cur.context(),
        });
    }
    cur.bump();
    let value = scan_string(cur, regs)?;
    *regs.define(&name)? = value;
    Ok(())
}

/// `@IMPORT name` — pull a variable from the process environment.
///
/// An absent variable is a silent no-op. Present values are auto-quoted
/// so they pass through the string scanner, unless already quoted or a
/// bare numeral (which goes into the table verbatim, ready to splice
/// into numeric contexts).
fn parse_import(cur: &mut Cursor, regs: &mut MacroTable) -> Result<(), ParseError> {
    skip_whitespace(cur, true)?;
    let name = scan_word(cur)?;
    let Ok(raw) = std::env::var(&name) else {
        return Ok(());
    };

    if is_bare_number(&raw) {
        *regs.define(&name)? = raw;
        return Ok(());
    }
    let quoted = if raw.starts_with(['\'', '"']) {
        raw
    } else {
        format!("\"{raw}\"")
    };
    let mut text = Cursor::new(&quoted);
    let value = scan_string(&mut text, regs)?;
    *regs.define(&name)? = value;
    Ok(())
}

fn is_bare_number(s: &str) -> bool {
    !s.is_empty()
        && !s.starts_with('$')
        && s.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '-')
}

/// `@INCLUDE [=] "path"` — parse another file into the current section
/// with the same macro table, making the include boundary invisible in
/// the resulting tree.
///
/// The optional form swallows path-resolution and read failures of its
/// own path; parse failures inside a successfully read file always
/// propagate.
fn parse_include(
    section: &mut Section,
    cur: &mut Cursor,
    regs: &mut MacroTable,
    optional: bool,
) -> Result<(), ParseError> {
    skip_whitespace(cur, true)?;
    if matches!(cur.peek(), '=' | ':') {
        cur.bump();
    }
    let path = scan_string(cur, regs)?;
    match read_file(Path::new(&path)) {
        Ok(text) => parse_str(section, &text, regs),
        Err(err) if optional => {
            tracing::debug!(path = %path, "skipping optional include: {err}");
            Ok(())
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(text: &str) -> Section {
        let mut root = Section::new("ROOT");
        let mut regs = MacroTable::default();
        parse_str(&mut root, text, &mut regs).expect("parse failed");
        root
    }

    fn parse_err(text: &str) -> ParseError {
        let mut root = Section::new("ROOT");
        let mut regs = MacroTable::default();
        parse_str(&mut root, text, &mut regs).expect_err("parse succeeded")
    }

    #[test]
    fn test_boolean_assignments() {
        let root = parse("EX_BOOL_0 = true; EX_BOOL_1 = FALSE");
        assert_eq!(root.get::<bool>("EX_BOOL_0"), Ok(true));
        assert_eq!(root.get::<bool>("EX_BOOL_1"), Ok(false));
    }

    #[test]
    fn test_define_and_string_substitution() {
        let root = parse(
            "@DEFINE MACRO_STR_0 = \"words\"\nEX_STRING_0 = \"$MACRO_STR_0 are defined\"",
        );
        assert_eq!(
            root.get::<String>("EX_STRING_0"),
            Ok("words are defined".to_string())
        );
    }

    #[test]
    fn test_signed_and_unsigned_integers() {
        let root = parse("EX_LONG_0 = -300; EX_LONG_1 = 300");
        assert_eq!(root.get::<i64>("EX_LONG_0"), Ok(-300));
        assert_eq!(root.get::<u32>("EX_LONG_1"), Ok(300));
    }

    #[test]
    fn test_quoted_number_substitutes_into_numeric_context() {
        let root = parse("@DEFINE N = '300'\nvalue = $N;");
        assert_eq!(root.get::<i64>("value"), Ok(300));
    }

    #[test]
    fn test_colon_assignment_and_floats() {
        let root = parse("ratio : 3.5\nneg : -0.25;");
        assert_eq!(root.get::<f64>("ratio"), Ok(3.5));
        assert_eq!(root.get::<f64>("neg"), Ok(-0.25));
    }

    #[test]
    fn test_nested_sections() {
        let root = parse("outer = { inner = { value = 7 } top = true }");
        let inner = root.section("outer").unwrap().section("inner").unwrap();
        assert_eq!(inner.get::<i64>("value"), Ok(7));
        assert_eq!(root.section("outer").unwrap().get::<bool>("top"), Ok(true));
    }

    #[test]
    fn test_split_section_definitions_merge() {
        let root = parse("s = { a = 1 }\ns = { b = 2 }");
        let s = root.section("s").unwrap();
        assert_eq!(s.get::<i64>("a"), Ok(1));
        assert_eq!(s.get::<i64>("b"), Ok(2));
    }

    #[test]
    fn test_last_assignment_wins() {
        let root = parse("key = 1; key = 2");
        assert_eq!(root.get::<i64>("key"), Ok(2));
    }

    #[test]
    fn test_vector_preserves_declared_order() {
        let root = parse("data_vector = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]");
        let items = root.vector("data_vector").unwrap();
        let values: Vec<i64> = items.iter().map(|s| s.as_integer().unwrap()).collect();
        assert_eq!(values, (0..=12).collect::<Vec<i64>>());
    }

    #[test]
    fn test_vector_elements_are_independently_typed() {
        let root = parse("mixed = (1, 'two', true, 4.0)");
        let items = root.vector("mixed").unwrap();
        assert_eq!(items[0], Scalar::Integer(1));
        assert_eq!(items[1], Scalar::Text("two".to_string()));
        assert_eq!(items[2], Scalar::Bool(true));
        assert_eq!(items[3], Scalar::Float(4.0));
    }

    #[test]
    fn test_comments_and_separators_are_transparent() {
        let root = parse("// leading\na = 1 /* mid */ ; b = 2 // trailing\n");
        assert_eq!(root.get::<i64>("a"), Ok(1));
        assert_eq!(root.get::<i64>("b"), Ok(2));
    }

    #[test]
    fn test_stray_vector_closers_are_skipped() {
        let root = parse("a = 1 ] ) b = 2");
        assert_eq!(root.get::<i64>("b"), Ok(2));
    }

    #[test]
    fn test_macro_may_prefix_a_value() {
        let root = parse("x = @DEFINE V = \"5\" $V;");
        assert_eq!(root.get::<i64>("x"), Ok(5));
    }

    #[test]
    fn test_define_references_earlier_macros() {
        let root = parse(
            "@DEFINE BASE = \"/opt\"\n@DEFINE FULL = \"$BASE/app\"\npath = \"${FULL}/etc\"",
        );
        assert_eq!(root.get::<String>("path"), Ok("/opt/app/etc".to_string()));
    }

    #[test]
    fn test_macro_redefinition_last_write_wins() {
        let root = parse("@DEFINE V = \"1\"\n@DEFINE V = \"2\"\nx = $V;");
        assert_eq!(root.get::<i64>("x"), Ok(2));
    }

    #[test]
    fn test_invalid_macro_keyword() {
        assert!(matches!(
            parse_err("@NONSENSE x = 1"),
            ParseError::InvalidMacro { .. }
        ));
    }

    #[test]
    fn test_missing_assignment_separator() {
        assert!(matches!(
            parse_err("key value"),
            ParseError::Expected { expected: '=', .. }
        ));
    }

    #[test]
    fn test_invalid_boolean_literal() {
        assert!(matches!(
            parse_err("flag = tru;"),
            ParseError::InvalidBoolean { .. }
        ));
    }

    #[test]
    fn test_import_absent_variable_is_a_no_op() {
        let root = parse("@IMPORT LCONF_SURELY_NOT_SET_0\nx = 1");
        assert_eq!(root.get::<i64>("x"), Ok(1));
    }

    #[test]
    fn test_import_string_variable() {
        unsafe { std::env::set_var("LCONF_PARSE_IMPORT_STR", "imported words") };
        let root = parse("@IMPORT LCONF_PARSE_IMPORT_STR\ns = \"$LCONF_PARSE_IMPORT_STR!\"");
        assert_eq!(root.get::<String>("s"), Ok("imported words!".to_string()));
    }

    #[test]
    fn test_import_bare_numeral_variable() {
        unsafe { std::env::set_var("LCONF_PARSE_IMPORT_NUM", "300") };
        let root = parse("@IMPORT LCONF_PARSE_IMPORT_NUM\nn = $LCONF_PARSE_IMPORT_NUM;");
        assert_eq!(root.get::<i64>("n"), Ok(300));
    }

    #[test]
    fn test_include_parses_into_current_section() {
        let dir = tempfile::tempdir().unwrap();
        let child = dir.path().join("child.cfg");
        let mut file = std::fs::File::create(&child).unwrap();
        writeln!(file, "included = 11\ns = {{ b = 2 }}").unwrap();

        let mut root = Section::new("ROOT");
        let mut regs = MacroTable::default();
        let text = format!("a = 1\ns = {{ a = 1 }}\n@INCLUDE = \"{}\"", child.display());
        parse_str(&mut root, &text, &mut regs).unwrap();

        // Include boundaries are invisible: entries land in ROOT, and the
        // split section merges across the boundary.
        assert_eq!(root.get::<i64>("included"), Ok(11));
        let s = root.section("s").unwrap();
        assert_eq!(s.get::<i64>("a"), Ok(1));
        assert_eq!(s.get::<i64>("b"), Ok(2));
    }

    #[test]
    fn test_include_separator_is_optional() {
        let dir = tempfile::tempdir().unwrap();
        let child = dir.path().join("bare.cfg");
        std::fs::write(&child, "bare = 5\n").unwrap();

        let mut root = Section::new("ROOT");
        let mut regs = MacroTable::default();
        let text = format!("@INCLUDE \"{}\"", child.display());
        parse_str(&mut root, &text, &mut regs).unwrap();
        assert_eq!(root.get::<i64>("bare"), Ok(5));
    }

    #[test]
    fn test_missing_include_is_fatal() {
        assert!(matches!(
            parse_err("@INCLUDE = \"/nonexistent/missing.cfg\"\nx = 1"),
            ParseError::Io { .. }
        ));
    }

    #[test]
    fn test_missing_optional_include_is_skipped() {
        let root = parse("@INCLUDE_OPTIONAL = \"/nonexistent/missing.cfg\"\nx = 1");
        assert_eq!(root.get::<i64>("x"), Ok(1));
        let root = parse("@INCLUDE* = \"/nonexistent/missing.cfg\"\ny = 2");
        assert_eq!(root.get::<i64>("y"), Ok(2));
    }

    #[test]
    fn test_parse_error_inside_optional_include_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let child = dir.path().join("broken.cfg");
        std::fs::write(&child, "key value-without-separator").unwrap();

        let mut root = Section::new("ROOT");
        let mut regs = MacroTable::default();
        let text = format!("@INCLUDE_OPTIONAL = \"{}\"", child.display());
        assert!(matches!(
            parse_str(&mut root, &text, &mut regs),
            Err(ParseError::Expected { .. })
        ));
    }

    #[test]
    fn test_reparse_is_idempotent() {
        let text = "a = 1\nb = \"two\"\ns = { c = true }\nv = [1, 2, 3]";
        assert_eq!(parse(text), parse(text));
    }
}
