use super::*;
use crate::fixed::FixedFormat;

fn setup(n: usize) -> (TransformSize, TwiddleTable) {
    let size = TransformSize::new(n).unwrap();
    let table = TwiddleTable::new(size, FixedFormat::Q16);
    (size, table)
}

fn block(stmt: &Stmt) -> &ButterflyBlock {
    match stmt {
        Stmt::Butterfly(block) => block,
        other => panic!("expected a butterfly block, got {:?}", other),
    }
}

fn mul(arg: Expr, coefficient: u64) -> Atom {
    Atom::Mul { arg, coefficient }
}

#[test]
fn test_classify_n16() {
    let size = TransformSize::new(16).unwrap();
    assert_eq!(Rotation::classify(0, size), Rotation::Identity);
    assert_eq!(Rotation::classify(4, size), Rotation::MinusI);
    assert_eq!(Rotation::classify(2, size), Rotation::EighthTurn);
    assert_eq!(Rotation::classify(6, size), Rotation::ThreeEighthsTurn);
    for m in [1, 3, 5, 7] {
        assert_eq!(Rotation::classify(m, size), Rotation::General);
    }
}

#[test]
fn test_classify_small_sizes() {
    // N/8 and 3N/8 collapse onto 0 below N = 8
    let size = TransformSize::new(4).unwrap();
    assert_eq!(Rotation::classify(0, size), Rotation::Identity);
    assert_eq!(Rotation::classify(1, size), Rotation::MinusI);
    let size = TransformSize::new(2).unwrap();
    assert_eq!(Rotation::classify(0, size), Rotation::Identity);
}

#[test]
fn test_stage0_is_real_only() {
    let (size, table) = setup(8);
    let emitter = ButterflyEmitter::new(size, &table);
    let mut zeros = ZeroTracker::new(8);
    let mut out = Vec::new();

    let stats = emitter.emit_stage(0, &mut zeros, &mut out);
    assert_eq!(stats, StageStats { butterflies: 4, multiplies: 0, declarations: 0 });
    assert_eq!(out.len(), 4);
    assert_eq!(zeros.live_count(), 0);

    let first = block(&out[0]);
    assert_eq!((first.u, first.t, first.twiddle), (0, 1, 0));
    assert_eq!(
        first.body,
        [
            Stmt::Let { var: Var::ReT, expr: Expr::var(Var::Re(1)) },
            Stmt::Let { var: Var::ReU, expr: Expr::var(Var::Re(0)) },
            Stmt::Assign {
                var: Var::Re(0),
                expr: Expr::var(Var::ReU).plus(Atom::Var(Var::ReT)),
            },
            Stmt::Assign {
                var: Var::Re(1),
                expr: Expr::var(Var::ReU).minus(Atom::Var(Var::ReT)),
            },
        ]
    );
}

#[test]
fn test_minus_i_on_real_input_declares_both_slots() {
    let (size, table) = setup(8);
    let emitter = ButterflyEmitter::new(size, &table);
    let mut zeros = ZeroTracker::new(8);
    let mut out = Vec::new();

    let multiplies = emitter.emit_butterfly(1, 1, 3, 2, &mut zeros, &mut out);
    assert_eq!(multiplies, 0);
    assert_eq!(out.len(), 3);
    assert_eq!(out[0], Stmt::Declare { var: Var::Im(1) });
    assert_eq!(out[1], Stmt::Declare { var: Var::Im(3) });
    assert_eq!(
        block(&out[2]).body,
        [
            Stmt::Let { var: Var::ImT, expr: Expr::zero().minus(Atom::Var(Var::Re(3))) },
            Stmt::Let { var: Var::ReU, expr: Expr::var(Var::Re(1)) },
            Stmt::Assign { var: Var::Re(3), expr: Expr::var(Var::ReU) },
            Stmt::Assign { var: Var::Im(1), expr: Expr::var(Var::ImT) },
            Stmt::Assign { var: Var::Im(3), expr: Expr::zero().minus(Atom::Var(Var::ImT)) },
        ]
    );
    assert!(zeros.is_live(1));
    assert!(zeros.is_live(3));
}

#[test]
fn test_minus_i_with_live_inputs() {
    let (size, table) = setup(8);
    let emitter = ButterflyEmitter::new(size, &table);
    let mut zeros = ZeroTracker::new(8);
    zeros.mark_live(1);
    zeros.mark_live(3);
    let mut out = Vec::new();

    emitter.emit_butterfly(1, 1, 3, 2, &mut zeros, &mut out);
    assert_eq!(out.len(), 1);
    let body = &block(&out[0]).body;
    assert_eq!(body[0], Stmt::Let { var: Var::ReT, expr: Expr::var(Var::Im(3)) });
    assert_eq!(body[1], Stmt::Let { var: Var::ImT, expr: Expr::zero().minus(Atom::Var(Var::Re(3))) });
    assert_eq!(body[3], Stmt::Let { var: Var::ImU, expr: Expr::var(Var::Im(1)) });
    assert_eq!(body.len(), 8);
}

#[test]
fn test_eighth_turn_dead_imaginary() {
    let (size, table) = setup(8);
    let emitter = ButterflyEmitter::new(size, &table);
    let mut zeros = ZeroTracker::new(8);
    let mut out = Vec::new();

    let multiplies = emitter.emit_butterfly(2, 1, 5, 1, &mut zeros, &mut out);
    assert_eq!(multiplies, 2);
    let body = &block(&out[2]).body;
    assert_eq!(
        body[0],
        Stmt::Let {
            var: Var::ReT,
            expr: Expr::zero().plus(mul(Expr::var(Var::Re(5)), 46340)),
        }
    );
    assert_eq!(
        body[1],
        Stmt::Let {
            var: Var::ImT,
            expr: Expr::zero().plus(mul(Expr::zero().minus(Atom::Var(Var::Re(5))), 46340)),
        }
    );
}

#[test]
fn test_three_eighths_turn_live_imaginary() {
    let (size, table) = setup(8);
    let emitter = ButterflyEmitter::new(size, &table);
    let mut zeros = ZeroTracker::new(8);
    zeros.mark_live(3);
    zeros.mark_live(7);
    let mut out = Vec::new();

    let multiplies = emitter.emit_butterfly(2, 3, 7, 3, &mut zeros, &mut out);
    assert_eq!(multiplies, 2);
    let body = &block(&out[0]).body;
    let re_arg = Expr::zero().minus(Atom::Var(Var::Re(7))).plus(Atom::Var(Var::Im(7)));
    let im_arg = Expr::zero().minus(Atom::Var(Var::Im(7))).minus(Atom::Var(Var::Re(7)));
    assert_eq!(body[0], Stmt::Let { var: Var::ReT, expr: Expr::zero().plus(mul(re_arg, 46340)) });
    assert_eq!(body[1], Stmt::Let { var: Var::ImT, expr: Expr::zero().plus(mul(im_arg, 46340)) });
}

#[test]
fn test_general_rotation_folds_signs() {
    // N = 16, m = 1: cos = 60547, sin = -25079
    let (size, table) = setup(16);
    let emitter = ButterflyEmitter::new(size, &table);
    let mut zeros = ZeroTracker::new(16);
    zeros.mark_live(1);
    zeros.mark_live(9);
    let mut out = Vec::new();

    let multiplies = emitter.emit_butterfly(3, 1, 9, 1, &mut zeros, &mut out);
    assert_eq!(multiplies, 4);
    let body = &block(&out[0]).body;
    let re = || Expr::var(Var::Re(9));
    let im = || Expr::var(Var::Im(9));
    assert_eq!(
        body[0],
        Stmt::Let {
            var: Var::ReT,
            expr: Expr::zero().plus(mul(re(), 60547)).plus(mul(im(), 25079)),
        }
    );
    assert_eq!(
        body[1],
        Stmt::Let {
            var: Var::ImT,
            expr: Expr::zero().minus(mul(re(), 25079)).plus(mul(im(), 60547)),
        }
    );
}

#[test]
fn test_general_rotation_dead_imaginary() {
    // N = 16, m = 7: cos = -60547, sin = -25079
    let (size, table) = setup(16);
    let emitter = ButterflyEmitter::new(size, &table);
    let mut zeros = ZeroTracker::new(16);
    let mut out = Vec::new();

    let multiplies = emitter.emit_butterfly(3, 7, 15, 7, &mut zeros, &mut out);
    assert_eq!(multiplies, 2);
    let body = &block(&out[2]).body;
    assert_eq!(
        body[0],
        Stmt::Let {
            var: Var::ReT,
            expr: Expr::zero().minus(mul(Expr::var(Var::Re(15)), 60547)),
        }
    );
    assert_eq!(
        body[1],
        Stmt::Let {
            var: Var::ImT,
            expr: Expr::zero().minus(mul(Expr::var(Var::Re(15)), 25079)),
        }
    );
}

#[test]
fn test_dead_inputs_are_never_read() {
    let (size, table) = setup(64);
    let emitter = ButterflyEmitter::new(size, &table);
    let mut zeros = ZeroTracker::new(64);
    let mut out = Vec::new();

    for stage in 0..size.log2_n() {
        let before = zeros.clone();
        let start = out.len();
        emitter.emit_stage(stage, &mut zeros, &mut out);
        for stmt in &out[start..] {
            let Stmt::Butterfly(block) = stmt else { continue };
            for inner in &block.body {
                let (Stmt::Let { expr, .. } | Stmt::Assign { expr, .. }) = inner else {
                    panic!("unexpected statement in block: {:?}", inner);
                };
                expr.for_each_var(&mut |var| {
                    if let Var::Im(slot) = var {
                        assert!(before.is_live(slot), "stage {} reads dead im{}", stage, slot);
                    }
                });
            }
        }
    }
}

#[test]
#[should_panic(expected = "stage 3 out of 3 stages")]
fn test_stage_out_of_range() {
    let (size, table) = setup(8);
    let emitter = ButterflyEmitter::new(size, &table);
    let mut zeros = ZeroTracker::new(8);
    emitter.emit_stage(3, &mut zeros, &mut Vec::new());
}

#[test]
#[should_panic(expected = "twiddle index 4 out of table")]
fn test_twiddle_out_of_range() {
    let (size, table) = setup(8);
    let emitter = ButterflyEmitter::new(size, &table);
    let mut zeros = ZeroTracker::new(8);
    emitter.emit_butterfly(2, 0, 4, 4, &mut zeros, &mut Vec::new());
}

#[test]
fn test_twiddle_index_per_stage() {
    let (size, table) = setup(1024);
    let emitter = ButterflyEmitter::new(size, &table);
    let mut zeros = ZeroTracker::new(1024);
    for stage in 0..10 {
        let mut out = Vec::new();
        emitter.emit_stage(stage, &mut zeros, &mut out);
        let power = 1u64 << stage;
        for stmt in &out {
            let Stmt::Butterfly(block) = stmt else { continue };
            let j = block.u as u64 % (2 * power);
            assert_eq!(block.twiddle as u64, j * 1024 / (2 * power));
        }
    }
}

#[test]
#[should_panic(expected = "zero tracker does not match transform size")]
fn test_tracker_size_mismatch() {
    let (size, table) = setup(8);
    let emitter = ButterflyEmitter::new(size, &table);
    let mut zeros = ZeroTracker::new(4);
    emitter.emit_stage(0, &mut zeros, &mut Vec::new());
}
