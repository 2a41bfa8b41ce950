//! Execution tests
//!
//! Converts LuaJS programs and runs the output in a Lua 5.2 VM with `bit32`
//! available. Each program leaves its answer in the global `result`.

use luajs_compiler::convert;
use mlua::Lua;

fn load(source: &str) -> (Lua, String) {
    let code = convert(source).unwrap_or_else(|e| panic!("conversion failed: {}", e));
    (Lua::new(), code)
}

/// Runs the converted program and returns `tostring(result)`.
fn run(source: &str) -> String {
    let (lua, code) = load(source);
    lua.load(code.as_str())
        .set_name("main")
        .exec()
        .unwrap_or_else(|e| panic!("{}\n--- converted ---\n{}", e, code));
    lua.load("return tostring(result)")
        .eval::<String>()
        .unwrap_or_else(|e| panic!("reading result failed: {}", e))
}

/// Runs the converted program, expecting it to raise a Lua error.
fn run_err(source: &str) -> String {
    let (lua, code) = load(source);
    match lua.load(code.as_str()).set_name("main").exec() {
        Ok(()) => panic!("expected a runtime error\n--- converted ---\n{}", code),
        Err(e) => e.to_string(),
    }
}

// ==================== Continue ====================

#[test]
fn test_continue_in_while() {
    let src = "
        let i = 0;
        let sum = 0;
        while (i < 10) {
            i++;
            if (i % 2 == 0) {
                continue;
            }
            let odd = i;
            sum += odd;
        }
        result = sum;
    ";
    assert_eq!(run(src), "25");
}

#[test]
fn test_continue_in_do_while_checks_condition() {
    let src = "
        let i = 0;
        let sum = 0;
        do {
            i++;
            if (i == 2) {
                continue;
            }
            sum += i;
        } while (i < 5);
        result = sum;
    ";
    assert_eq!(run(src), "13");
}

#[test]
fn test_continue_in_generic_for_runs_update() {
    let src = "
        let out = [];
        for (let i = 0; i < 5; i++) {
            if (i == 1) {
                continue;
            }
            table.insert(out, i);
        }
        result = table.concat(out, ',');
    ";
    assert_eq!(run(src), "0,2,3,4");
}

#[test]
fn test_continue_in_numeric_for() {
    let src = "
        let sum = 0;
        for (let i = 1; i <= 9; i++) {
            if (i % 2 == 0) { continue; }
            sum += i;
        }
        result = sum;
    ";
    assert_eq!(run(src), "25");
}

#[test]
fn test_continue_in_for_in() {
    let src = "
        let t = {a: 1, b: 2, c: 3};
        let sum = 0;
        for (let k, v in pairs(t)) {
            if (k == 'b') {
                continue;
            }
            sum += v;
        }
        result = sum;
    ";
    assert_eq!(run(src), "4");
}

#[test]
fn test_continue_in_for_of() {
    let src = "
        let list = [10, 20, 30, 40];
        let sum = 0;
        for (let v, i of list) {
            if (i == 2) {
                continue;
            }
            sum += v;
        }
        result = sum;
    ";
    assert_eq!(run(src), "80");
}

#[test]
fn test_continue_in_nested_loops() {
    let src = "
        let out = [];
        let i = 0;
        while (i < 3) {
            i++;
            if (i == 2) { continue; }
            for (let j = 1; j <= 3; j++) {
                if (j == i) { continue; }
                table.insert(out, i .. j);
            }
        }
        result = table.concat(out, ',');
    ";
    assert_eq!(run(src), "12,13,31,32");
}

#[test]
fn test_break() {
    let src = "
        let i = 0;
        while (true) {
            i++;
            if (i > 3) { break; }
        }
        result = i;
    ";
    assert_eq!(run(src), "4");
}

// ==================== Numeric loops ====================

/// Source of a loop over `i` that records every visited value.
fn collecting_loop(start: &str, compare: &str, stop: &str, update: &str) -> String {
    format!(
        "let out = [];\n\
         let stop = {stop};\n\
         for (let i = {start}; i {compare} STOP; {update}) {{ table.insert(out, i); }}\n\
         result = table.concat(out, ',');"
    )
}

#[test]
fn test_numeric_and_generic_loops_visit_the_same_values() {
    let cases = [
        ("0", "<=", "5", "i++"),
        ("5", ">=", "0", "i--"),
        ("0", "<=", "10", "i += 3"),
        ("10", ">=", "1", "i -= 4"),
        ("0", "<=", "2", "i += 0.5"),
        ("3", "<=", "1", "i++"),
        ("1", ">=", "3", "i--"),
        ("4", "<=", "4", "i += 2"),
    ];

    for (start, compare, stop, update) in cases {
        let template = collecting_loop(start, compare, stop, update);
        let numeric = template.replace("STOP", stop);
        let generic = template.replace("STOP", "stop");

        let numeric_out = convert(&numeric).unwrap();
        let generic_out = convert(&generic).unwrap();
        assert!(numeric_out.contains("for i = "), "{}", numeric_out);
        assert!(generic_out.contains("while ("), "{}", generic_out);

        assert_eq!(run(&numeric), run(&generic), "for (i = {start}; i {compare} {stop}; {update})");
    }
}

// ==================== Try/Catch ====================

#[test]
fn test_try_catch_receives_thrown_value() {
    let src = "
        let log = [];
        try {
            table.insert(log, 'a');
            throw {msg: 'boom'};
            table.insert(log, 'b');
        } catch (e) {
            table.insert(log, e.msg);
        }
        result = table.concat(log, ',');
    ";
    assert_eq!(run(src), "a,boom");
}

#[test]
fn test_try_without_error_skips_handler() {
    let src = "
        let x = 0;
        try { x = 1; } catch (e) { x = 2; }
        result = x;
    ";
    assert_eq!(run(src), "1");
}

#[test]
fn test_nested_try_rethrow() {
    let src = "
        let log = [];
        try {
            try {
                throw {code: 1};
            } catch (e) {
                table.insert(log, 'inner' .. e.code);
                throw {code: e.code + 1};
            }
        } catch (e) {
            table.insert(log, 'outer' .. e.code);
        }
        result = table.concat(log, ',');
    ";
    assert_eq!(run(src), "inner1,outer2");
}

#[test]
fn test_try_inside_numeric_loop() {
    let src = "
        let sum = 0;
        for (let i = 1; i <= 4; i++) {
            try {
                if (i == 2) { throw 'skip'; }
                sum += i;
            } catch {
                sum += 100;
            }
        }
        result = sum;
    ";
    assert_eq!(run(src), "108");
}

#[test]
fn test_runtime_errors_report_source_line() {
    let src = "let a = 1;\n\nlet b = nil;\nlet c = b.x;";
    let err = run_err(src);
    assert!(err.contains(":4:"), "{}", err);
}

// ==================== Expressions ====================

#[test]
fn test_concat_coerces_operands() {
    assert_eq!(run("result = 1 .. true .. nil .. 's';"), "1truenils");
    assert_eq!(run("let x = 'a'; x ..= 2; x ..= false; result = x;"), "a2false");
}

#[test]
fn test_bitwise_operators() {
    let src = "
        result = (5 & 3) .. ',' .. (5 | 3) .. ',' .. (5 ^ 3) .. ','
            .. (1 << 4) .. ',' .. (256 >> 4) .. ',' .. ~0;
    ";
    assert_eq!(run(src), "1,7,6,16,16,4294967295");
}

#[test]
fn test_logic_and_ternary() {
    let src = "
        let a = 5;
        result = (a > 3 ? 'big' : 'small') .. (a != 5 ? '!' : '=')
            .. (!(a == 5) ? 'x' : 'y') .. (a > 1 && a < 9 || false ? 'in' : 'out');
    ";
    assert_eq!(run(src), "big=yin");
}

#[test]
fn test_arithmetic_and_compound_assignment() {
    assert_eq!(run("result = 2 ** 10 + 7 % 3;"), "1025");
    assert_eq!(run("let x = 10; x *= 2 + 3; x -= 1 - 1; result = x;"), "50");
    assert_eq!(run("let t = [3]; t[1] **= 2; result = #t .. ':' .. t[1];"), "1:9");
}

#[test]
fn test_methods_and_function_literals() {
    let src = "
        let obj = {n: 1};
        function obj:add(k) {
            self.n += k;
            return self;
        }
        obj:add(2):add(3);
        let double = x => x * 2;
        let sum = (a, b) => { return a + b; };
        result = double(sum(obj.n, 1));
    ";
    assert_eq!(run(src), "14");
}

#[test]
fn test_unicode_escapes() {
    assert_eq!(run(r#"result = "\u0041\u00e9";"#), "A\u{e9}");
}
