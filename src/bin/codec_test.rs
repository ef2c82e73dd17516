use hashsheet::codec::{coerce_cell, decode, decode_hash, encode, try_decode};
use hashsheet::error::CodecError;
use hashsheet::grid::{COLS, CellAddress, Grid, ROWS};
use serde_json::{Value, json};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// Percent-encode a JSON value the same way a stored link would look
fn fragment_of(value: &Value) -> String {
    urlencoding::encode(&value.to_string()).into_owned()
}

fn row_of(value: &str) -> Value {
    json!(vec![value; COLS])
}

fn sample_grid() -> Grid {
    let mut grid = Grid::create_empty();
    grid.set_cell(0, 0, "plain").unwrap();
    grid.set_cell(1, 3, "with space & ampersand").unwrap();
    grid.set_cell(2, 5, "#hash%percent?query=1").unwrap();
    grid.set_cell(4, 4, "quote \" and backslash \\").unwrap();
    grid.set_cell(6, 1, "ünïcödé ✓ 表格 🎉").unwrap();
    grid.set_cell(8, 8, "line\nbreak\ttab").unwrap();
    grid.set_cell(9, 9, "[\"not\",\"nested\"]").unwrap();
    grid
}

#[cfg_attr(test, test)]
fn test_round_trip() {
    println!("\n====== Testing encode/decode round trip ======");
    init_logging();

    let grid = sample_grid();
    let encoded = encode(&grid);
    assert!(!encoded.contains('#'));
    assert!(!encoded.contains(' '));
    assert!(!encoded.contains('"'));
    println!("✓ Encoded fragment is URL-safe ({} bytes)", encoded.len());

    let decoded = decode(&encoded).expect("round trip should decode");
    assert_eq!(decoded, grid);
    println!("✓ Special characters and unicode survive the round trip");

    let empty = Grid::create_empty();
    assert_eq!(decode(&encode(&empty)), Some(empty));
    println!("✓ Empty grid survives the round trip");
}

// Cell contents built from a fixed pool: every printable ASCII character,
// escape-looking text, astral-plane emoji and other non-ASCII script.
fn generated_cells() -> Vec<String> {
    let ascii: Vec<char> = (0x20u8..0x7f).map(char::from).collect();
    let pieces = [
        "%", "%25", "%zz", "%%", "#", "&=?", "\\u0000", "\0", "\"", "\\", "\n", "\t", "🎉", "👩‍💻", "𝄞",
        "表格", "ünï", "\u{202e}", " ", "+",
    ];

    let mut cells: Vec<String> = ascii.iter().map(char::to_string).collect();
    cells.push(ascii.iter().collect());
    for (i, piece) in pieces.iter().enumerate() {
        for (j, other) in pieces.iter().enumerate().skip(i) {
            cells.push(format!("{}{}{}", piece, ascii[(i * 7 + j) % ascii.len()], other));
        }
    }
    cells
}

#[cfg_attr(test, test)]
fn test_round_trip_generated() {
    println!("\n====== Testing round trip over generated grids ======");
    init_logging();

    let cells = generated_cells();
    let mut grids = 0;
    for chunk in cells.chunks(ROWS * COLS / 2) {
        let mut grid = Grid::create_empty();
        // Leave every other cell empty so empty strings are mixed in
        for (address, value) in CellAddress::all().step_by(2).zip(chunk.iter()) {
            grid.set(address, value.as_str());
        }
        assert_eq!(decode(&encode(&grid)), Some(grid));
        grids += 1;
    }
    assert!(grids > 3);
    println!("✓ {} generated grids ({} cell values) survive the round trip", grids, cells.len());
}

#[cfg_attr(test, test)]
fn test_encoded_form() {
    println!("\n====== Testing encoded form ======");
    let grid = sample_grid();
    let text = urlencoding::decode(&encode(&grid)).unwrap().into_owned();
    let parsed: Value = serde_json::from_str(&text).unwrap();

    let rows = parsed.as_array().unwrap();
    assert_eq!(rows.len(), ROWS);
    assert!(rows.iter().all(|row| row.as_array().map(Vec::len) == Some(COLS)));
    assert_eq!(rows[0][0], json!("plain"));
    println!("✓ Fragment decodes to a 10x10 JSON array of strings");
}

#[cfg_attr(test, test)]
fn test_decode_robustness() {
    println!("\n====== Testing decode robustness ======");
    init_logging();

    assert_eq!(decode("not valid"), None);
    assert_eq!(decode(""), None);
    assert_eq!(decode("%E0%A4%A"), None);
    assert_eq!(decode("%zz"), None);
    assert_eq!(decode(&fragment_of(&json!({"rows": 10}))), None);
    assert_eq!(decode(&fragment_of(&json!("just a string"))), None);
    println!("✓ Malformed fragments return None without panicking");

    assert!(matches!(try_decode("not valid"), Err(CodecError::Json(_))));
    assert!(matches!(try_decode("%FF%FE"), Err(CodecError::Percent(_))));
    println!("✓ try_decode reports why a fragment was rejected");
}

#[cfg_attr(test, test)]
fn test_malformed_escape_in_valid_json() {
    println!("\n====== Testing malformed escapes ======");
    init_logging();

    let mut grid = Grid::create_empty();
    grid.set_cell(0, 0, "MARK").unwrap();
    let encoded = encode(&grid);
    assert!(encoded.contains("MARK"));

    // The rest of the fragment is a valid sheet; only the raw escape is broken
    let tampered = encoded.replace("MARK", "100%zz");
    assert_eq!(decode(&tampered), None);
    assert!(matches!(
        try_decode(&tampered),
        Err(CodecError::MalformedEscape { .. })
    ));
    println!("✓ '%zz' inside a cell rejects the whole fragment");

    let trailing = format!("{}%", encoded);
    assert!(matches!(
        try_decode(&trailing),
        Err(CodecError::MalformedEscape { position }) if position == encoded.len()
    ));
    assert!(matches!(
        try_decode(&format!("{}%4", encoded)),
        Err(CodecError::MalformedEscape { .. })
    ));
    println!("✓ Truncated escapes at the end are rejected");

    assert_eq!(decode(&encoded.replace("MARK", "%4d%41RK")), Some(grid));
    println!("✓ Lowercase hex escapes are still accepted");
}

#[cfg_attr(test, test)]
fn test_decode_hash() {
    println!("\n====== Testing decode_hash ======");
    let grid = sample_grid();
    let encoded = encode(&grid);

    assert_eq!(decode_hash(&format!("#{}", encoded)), Some(grid.clone()));
    assert_eq!(decode_hash(&encoded), Some(grid));
    assert_eq!(decode_hash("#"), None);
    assert_eq!(decode_hash(""), None);
    println!("✓ Leading '#' is stripped and an empty hash means no state");
}

#[cfg_attr(test, test)]
fn test_shape_strictness() {
    println!("\n====== Testing outer shape strictness ======");
    init_logging();

    let nine_rows = json!(vec![row_of("x"); ROWS - 1]);
    assert_eq!(decode(&fragment_of(&nine_rows)), None);
    match try_decode(&fragment_of(&nine_rows)) {
        Err(CodecError::Shape { expected, found }) => {
            assert_eq!(expected, ROWS);
            assert_eq!(found, "an array of 9");
        }
        other => panic!("expected a shape error, got {:?}", other),
    }
    println!("✓ 9 rows are rejected");

    let eleven_rows = json!(vec![row_of("x"); ROWS + 1]);
    assert_eq!(decode(&fragment_of(&eleven_rows)), None);
    println!("✓ 11 rows are rejected");
}

#[cfg_attr(test, test)]
fn test_shape_leniency() {
    println!("\n====== Testing row leniency ======");
    init_logging();

    let mut rows = vec![row_of("keep"); ROWS];
    rows[3] = json!(["a", "b", "c", "d", "e"]);
    rows[5] = json!("not a row");
    rows[7] = json!(vec!["long"; COLS + 1]);
    let grid = decode(&fragment_of(&json!(rows))).expect("rows of the wrong length are tolerated");

    for address in CellAddress::all() {
        let expected = match address.row() {
            3 | 5 | 7 => "",
            _ => "keep",
        };
        assert_eq!(grid.get(address), expected, "cell {}", address);
    }
    println!("✓ Short, long and non-array rows become empty, others are preserved");
}

#[cfg_attr(test, test)]
fn test_cell_coercion() {
    println!("\n====== Testing cell coercion ======");
    assert_eq!(coerce_cell(&json!(null)), "");
    assert_eq!(coerce_cell(&json!(false)), "");
    assert_eq!(coerce_cell(&json!(0)), "");
    assert_eq!(coerce_cell(&json!(0.0)), "");
    assert_eq!(coerce_cell(&json!("")), "");
    println!("✓ Falsy values become empty strings");

    assert_eq!(coerce_cell(&json!(true)), "true");
    assert_eq!(coerce_cell(&json!(42)), "42");
    assert_eq!(coerce_cell(&json!(-7)), "-7");
    assert_eq!(coerce_cell(&json!(1.5)), "1.5");
    assert_eq!(coerce_cell(&json!(3.0)), "3");
    assert_eq!(coerce_cell(&json!([1, null, "a"])), "1,,a");
    assert_eq!(coerce_cell(&json!({"k": "v"})), "[object Object]");
    assert_eq!(coerce_cell(&json!("text")), "text");
    println!("✓ Other values take their plain-text form");

    assert_eq!(coerce_cell(&json!(1e21)), "1e+21");
    assert_eq!(coerce_cell(&json!(-2.5e30)), "-2.5e+30");
    assert_eq!(coerce_cell(&json!(1e-7)), "1e-7");
    assert_eq!(coerce_cell(&json!(0.000001)), "0.000001");
    assert_eq!(coerce_cell(&json!(123456789012345680000.0)), "123456789012345680000");
    assert_eq!(coerce_cell(&json!(9007199254740993u64)), "9007199254740992");
    println!("✓ Numbers print as browsers print doubles");

    let mut rows = vec![json!(vec![Value::Null; COLS]); ROWS];
    rows[0] = json!([1, true, null, "x", 2.5, false, 0, "", [1, 2], "y"]);
    let grid = decode(&fragment_of(&json!(rows))).unwrap();
    let first: Vec<&str> = grid.rows().next().unwrap().iter().map(String::as_str).collect();
    assert_eq!(first, vec!["1", "true", "", "x", "2.5", "", "", "", "1,2", "y"]);
    assert!(grid.rows().skip(1).flatten().all(String::is_empty));
    println!("✓ Mixed-type rows decode cell by cell");
}

pub fn run_tests() {
    println!("Starting codec unit tests");
    test_round_trip();
    test_round_trip_generated();
    test_encoded_form();
    test_decode_robustness();
    test_malformed_escape_in_valid_json();
    test_decode_hash();
    test_shape_strictness();
    test_shape_leniency();
    test_cell_coercion();
    println!("All tests passed!");
}

fn main() {
    run_tests();
}
