use compiler::{compile, CompileError};

#[test]
fn empty_body_program_compiles_to_a_bare_stop() {
    let output = compile("program start stop").unwrap();
    assert_eq!(output.code, "STOP\n");
    assert!(output.warnings.is_empty());
}

#[test]
fn sample_programs_compile_without_warnings() {
    for src in [
        include_str!("../../test/countdown.toy"),
        include_str!("../../test/squares.toy"),
    ] {
        let output = compile(src).unwrap();
        assert!(output.warnings.is_empty());
        assert!(output.code.contains("STOP\n"));
    }
}

#[test]
fn countdown_loops_and_reserves_storage() {
    let output =
        compile(include_str!("../../test/countdown.toy")).unwrap();
    assert!(output.code.starts_with("READ n\n"));
    assert!(output.code.contains("L0: "));
    assert!(output.code.contains("BRZNEG L1\n"));
    assert!(output.code.contains("BR L0\n"));
    assert!(output.code.contains("L1: NOOP\n"));
    // declared variable first, temporaries after, all zero-initialized
    let trailer = output.code.split_once("STOP\n").unwrap().1;
    assert!(trailer.starts_with("n 0\n"));
    assert!(trailer.contains("T0 0\n"));
}

#[test]
fn unused_variables_warn_but_still_compile() {
    let output = compile(
        "program var a, 1 b, 2 c, 3; start read a; stop",
    )
    .unwrap();
    assert_eq!(output.warnings.len(), 2);
    assert!(output.warnings[0].contains("'b'"));
    assert!(output.warnings[1].contains("'c'"));
    assert!(output.code.contains("READ a\n"));
}

#[test]
fn undeclared_use_fails_before_any_code_is_generated() {
    let err = compile("program start print missing; stop").unwrap_err();
    assert_eq!(
        err,
        CompileError::Undeclared {
            name: "missing".to_string(),
            line: 1
        }
    );
}

#[test]
fn syntax_errors_carry_the_offending_line() {
    let err = compile("program\nstart\nset x 1 +\nstop").unwrap_err();
    match err {
        CompileError::Syntax { line, .. } => assert_eq!(line, 4),
        other => panic!("expected a syntax error, got {other:?}"),
    }
}

#[test]
fn unrecognized_characters_are_lexical_errors() {
    let err = compile("program start read ?; stop").unwrap_err();
    assert_eq!(
        err,
        CompileError::Lexical {
            lexeme: "?".to_string(),
            line: 1
        }
    );
}

#[test]
fn empty_input_is_rejected() {
    assert_eq!(compile("  \n\t ").unwrap_err(), CompileError::EmptyInput);
}

#[test]
fn comments_do_not_disturb_compilation() {
    let plain = compile("program var a, 1; start read a; stop").unwrap();
    let commented = compile(
        "program @@ declarations @ var a, 1; start read a; @@ done @ stop",
    )
    .unwrap();
    assert_eq!(plain.code, commented.code);
}
