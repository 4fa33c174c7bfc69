//! Verification tests.
//!
//! Renders challenge markup with learner styles and checks requirements
//! against the result, end to end through the public API.

use csskata::challenge::Catalog;
use csskata::dom::PseudoElement;
use csskata::preview::{PreviewDocument, PreviewRenderer};
use csskata::verify::{
    Comparator, Requirement, RequirementSet, Verifier, percent_completed, verify,
};
use proptest::prelude::*;

fn render(markup: &str, styles: &str) -> PreviewDocument {
    PreviewRenderer::default().render(markup, styles)
}

fn holds(document: &PreviewDocument, requirement: Requirement) -> bool {
    verify(Some(document), &requirement.into())
}

const BALLS: &str = r#"<div id="snowman"><div id="ball-1" class="ball"></div></div>"#;
const CARD: &str = r#"<div id="card">🔷</div>"#;

// ============================================================================
// Unit Requirements
// ============================================================================

#[test]
fn test_ball_width_at_least_100px() {
    let wide = || Requirement::unit(".ball", "width", Comparator::GreaterOrEqual, "100px");

    assert!(holds(&render(BALLS, ".ball { width: 130px; }"), wide()));
    assert!(!holds(&render(BALLS, ".ball { width: 80px; }"), wide()));
}

#[test]
fn test_unit_comparator_boundaries() {
    let check = |actual: &str, comparator| {
        let doc = render(BALLS, &format!(".ball {{ width: {actual}; }}"));
        holds(&doc, Requirement::unit(".ball", "width", comparator, "100px"))
    };

    assert!(check("100px", Comparator::Equal));
    assert!(!check("99px", Comparator::GreaterOrEqual));
    assert!(check("150px", Comparator::GreaterOrEqual));
    assert!(check("150px", Comparator::Greater));
    assert!(!check("100px", Comparator::Greater));
    assert!(check("100px", Comparator::LessOrEqual));
    assert!(check("99px", Comparator::NotEqual));
}

#[test]
fn test_equivalent_units_compare_equal() {
    let doc = render(
        BALLS,
        ".ball { width: 6.25rem; animation-duration: 2500ms; transform: rotate(45deg); }",
    );
    assert!(holds(&doc, Requirement::unit(".ball", "width", Comparator::Equal, "100px")));
    assert!(holds(&doc, Requirement::unit(".ball", "width", Comparator::Equal, "6.25rem")));
    assert!(holds(
        &doc,
        Requirement::unit(".ball", "animation-duration", Comparator::GreaterOrEqual, "2.5s")
    ));
    assert!(holds(&doc, Requirement::unit(".ball", "transform", Comparator::Equal, "45deg")));
    assert!(holds(&doc, Requirement::unit(".ball", "transform", Comparator::Equal, "0.125turn")));
}

#[test]
fn test_rotate3d_reads_back_its_angle() {
    let catalog = Catalog::builtin().unwrap();
    let chessboard = catalog.get("chessboard").unwrap();
    let doc = render(&chessboard.markup, &chessboard.starting_styles);
    let turned = |comparator, expected: &str| {
        holds(&doc, Requirement::unit("#chessboard", "transform", comparator, expected))
    };

    assert!(turned(Comparator::Equal, "45deg"));
    assert!(turned(Comparator::Equal, "0.125turn"));
    assert!(turned(Comparator::GreaterOrEqual, "45deg"));
    assert!(turned(Comparator::LessOrEqual, "45deg"));
    assert!(!turned(Comparator::Equal, "44.9deg"));
    assert!(!turned(Comparator::Greater, "45deg"));
}

#[test]
fn test_matrix_rotation_reads_back_in_signed_range() {
    let doc = render(BALLS, ".ball { transform: rotate(270deg); }");
    assert!(holds(&doc, Requirement::unit(".ball", "transform", Comparator::Equal, "-90deg")));
    assert!(!holds(&doc, Requirement::unit(".ball", "transform", Comparator::Equal, "270deg")));
}

#[test]
fn test_overflowing_numbers_fail_closed() {
    let doc = render(BALLS, ".ball { width: 10px; animation-duration: 1e39s; }");
    assert!(!holds(
        &doc,
        Requirement::unit(".ball", "animation-duration", Comparator::Less, "1s")
    ));
    assert!(holds(
        &doc,
        Requirement::unit(".ball", "animation-duration", Comparator::Greater, "1000000s")
    ));
    assert!(!holds(&doc, Requirement::unit(".ball", "width", Comparator::Equal, "1e400px")));
    assert!(!holds(&doc, Requirement::unit(".ball", "width", Comparator::NotEqual, "1e400px")));
}

#[test]
fn test_em_resolves_against_element_font_size() {
    let doc = render(BALLS, "#snowman { font-size: 20px; } .ball { width: 5em; }");
    assert!(holds(&doc, Requirement::unit(".ball", "width", Comparator::Equal, "100px")));
    assert!(holds(&doc, Requirement::unit(".ball", "width", Comparator::Equal, "5em")));
}

#[test]
fn test_percentages_against_parent_width() {
    let doc = render(BALLS, "#snowman { width: 400px; } .ball { width: 25%; }");
    assert!(holds(&doc, Requirement::unit(".ball", "width", Comparator::Equal, "25%")));
    assert!(holds(&doc, Requirement::unit("#snowman", "width", Comparator::Equal, "400px")));
}

#[test]
fn test_incompatible_units_fail() {
    let doc = render(BALLS, ".ball { width: 100px; }");
    assert!(!holds(&doc, Requirement::unit(".ball", "width", Comparator::NotEqual, "1s")));
    assert!(!holds(&doc, Requirement::unit(".ball", "display", Comparator::Equal, "1px")));
    assert!(!holds(&doc, Requirement::unit(".ball", "width", Comparator::Equal, "wide")));
}

// ============================================================================
// Literal and Authored Requirements
// ============================================================================

#[test]
fn test_exact_display_grid() {
    let grid = || Requirement::literal("#card", "display", "grid").exact();

    assert!(holds(&render(CARD, "#card { display: grid; }"), grid()));
    assert!(!holds(&render(CARD, "#card { display: flex; }"), grid()));
    assert!(!holds(&render(CARD, "p { display: grid; }"), grid()));
}

#[test]
fn test_exact_ignores_values_from_other_rules() {
    // The computed value is grid either way; only the authored rule counts.
    let doc = render(CARD, "div { display: grid; } #card { color: red; }");
    assert!(holds(&doc, Requirement::literal("#card", "display", "grid")));
    assert!(!holds(&doc, Requirement::literal("#card", "display", "grid").exact()));
}

#[test]
fn test_exact_sees_unresolved_variables() {
    let doc = render(
        BALLS,
        ".ball { --base-size: 100px; width: calc(var(--base-size) * 1.3); }",
    );
    assert!(holds(
        &doc,
        Requirement::literal(".ball", "width", "calc(var(--base-size) * 1.3)").exact()
    ));
    assert!(holds(&doc, Requirement::literal(".ball", "width", "130px")));
}

#[test]
fn test_exact_ignores_other_stylesheets() {
    let markup = format!("{CARD}<style>#card {{ display: grid; }}</style>");
    let doc = render(&markup, "");
    assert!(holds(&doc, Requirement::literal("#card", "display", "grid")));
    assert!(!holds(&doc, Requirement::literal("#card", "display", "grid").exact()));
}

#[test]
fn test_pseudo_element_z_index() {
    let doc = render(CARD, "#card::before { z-index: -1; position: absolute; }");
    let behind =
        Requirement::literal("#card", "z-index", "-1").on_pseudo(PseudoElement::Before);
    assert!(holds(&doc, behind));
    assert!(!holds(&doc, Requirement::literal("#card", "z-index", "-1")));
}

#[test]
fn test_angle_brackets_inside_strings_keep_rules() {
    let markup = r#"<div id="a"></div><div id="b"><div id="c"></div></div>"#;
    let doc = render(
        markup,
        r#"#a::before { content: "<3"; } #a { width: 5px; } #b > #c { width: 10px; }"#,
    );
    assert!(holds(&doc, Requirement::unit("#a", "width", Comparator::Equal, "5px")));
    assert!(holds(&doc, Requirement::unit("#c", "width", Comparator::Equal, "10px")));
    assert!(holds(
        &doc,
        Requirement::literal("#a", "content", r#""<3""#).on_pseudo(PseudoElement::Before)
    ));
}

#[test]
fn test_styles_cannot_close_their_style_element() {
    let doc = render(
        r#"<p id="note"></p>"#,
        "#note { width: 5px; } </StYlE><p id=\"injected\"></p><style> #note { height: 7px; }",
    );
    assert!(holds(&doc, Requirement::unit("#note", "width", Comparator::Equal, "5px")));
    assert!(!holds(&doc, Requirement::literal("#injected", "display", "block")));
}

#[test]
fn test_colors_compare_in_canonical_form() {
    let doc = render(CARD, "#card { background-color: #111827; color: rebeccapurple; }");
    assert!(holds(&doc, Requirement::literal("#card", "background-color", "rgb(17, 24, 39)")));
    assert!(holds(&doc, Requirement::literal("#card", "color", "rgb(102, 51, 153)")));
    assert!(!holds(&doc, Requirement::literal("#card", "background-color", "#111827")));
}

// ============================================================================
// Sets and Tasks
// ============================================================================

#[test]
fn test_set_requires_every_member() {
    let doc = render(
        r#"<div id="snowman"></div>"#,
        "#snowman { display: flex; flex-direction: column; }",
    );
    let centered = |align: &str| {
        RequirementSet::All(vec![
            Requirement::literal("#snowman", "display", "flex"),
            Requirement::literal("#snowman", "flex-direction", "column"),
            Requirement::literal("#snowman", "align-items", align),
        ])
    };
    assert!(!verify(Some(&doc), &centered("center")));
    assert!(verify(Some(&doc), &centered("normal")));
}

#[test]
fn test_snowman_solution_completes_every_task() {
    let catalog = Catalog::builtin().unwrap();
    let snowman = catalog.get("snowman").unwrap();
    let solution = "
        #snowman { display: flex; flex-direction: column; align-items: center; }
        .ball {
            --base-size: 100px;
            width: var(--base-size);
            aspect-ratio: 1;
            border-radius: 50%;
            background-color: #fff;
        }
        #ball-2 { width: calc(var(--base-size) * 1.3); }
        #ball-3 { width: calc(var(--base-size) * 1.7); }
    ";

    let doc = render(&snowman.markup, solution);
    let tasks = Verifier::new().verify_tasks(Some(&doc), &snowman.tasks);
    let failed: Vec<_> = tasks.iter().filter(|t| !t.completed).map(|t| &t.task.text).collect();
    assert!(failed.is_empty(), "incomplete tasks: {failed:?}");
    assert_eq!(percent_completed(&tasks), 100);
}

#[test]
fn test_snowman_starting_styles_complete_nothing() {
    let catalog = Catalog::builtin().unwrap();
    let snowman = catalog.get("snowman").unwrap();
    let doc = render(&snowman.markup, &snowman.starting_styles);
    let tasks = Verifier::new().verify_tasks(Some(&doc), &snowman.tasks);
    assert_eq!(percent_completed(&tasks), 0);
}

#[test]
fn test_gradient_card_solution_completes_every_task() {
    let catalog = Catalog::builtin().unwrap();
    let card = catalog.get("animated-gradient-border-card").unwrap();
    let solution = r#"
        #card {
            position: relative;
            width: 300px;
            aspect-ratio: 2/3;
            border-radius: 8px;
            background-color: #111827;
            display: grid;
            place-items: center;
            font-size: 4rem;
        }

        #card:before {
            position: absolute;
            inset: -0.3rem;
            content: "";
            z-index: -1;
            border-radius: 12px;
            background-image: linear-gradient(
                var(--rotation),
                #5ddcff,
                #3c67e3 43%,
                #4e00c2
            );
            animation: spin 2.5s linear infinite;
        }
    "#;

    let doc = render(&card.markup, solution);
    let tasks = Verifier::new().verify_tasks(Some(&doc), &card.tasks);
    let failed: Vec<_> = tasks.iter().filter(|t| !t.completed).map(|t| &t.task.text).collect();
    assert!(failed.is_empty(), "incomplete tasks: {failed:?}");
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_missing_element_never_passes(
        id in "[a-z]{1,8}",
        negated in any::<bool>(),
        comparator in prop_oneof![
            Just(Comparator::Greater),
            Just(Comparator::GreaterOrEqual),
            Just(Comparator::Less),
            Just(Comparator::LessOrEqual),
            Just(Comparator::Equal),
            Just(Comparator::NotEqual),
        ],
    ) {
        let doc = render("<p class=\"present\"></p>", ".present { width: 10px; }");
        let selector = format!("#missing-{id}");
        let mut literal = Requirement::literal(&selector, "width", "10px");
        if negated {
            literal = literal.negate();
        }
        prop_assert!(!holds(&doc, literal.clone()));
        prop_assert!(!holds(&doc, literal.exact()));
        prop_assert!(!holds(&doc, Requirement::unit(&selector, "width", comparator, "10px")));
    }

    #[test]
    fn prop_verification_is_idempotent(width in 0u32..500, threshold in 0u32..500) {
        let doc = render(BALLS, &format!(".ball {{ width: {width}px; }}"));
        let set: RequirementSet = Requirement::unit(
            ".ball",
            "width",
            Comparator::GreaterOrEqual,
            format!("{threshold}px"),
        )
        .into();
        let mut verifier = Verifier::new();
        let first = verifier.verify(Some(&doc), &set);
        prop_assert_eq!(first, verifier.verify(Some(&doc), &set));
        prop_assert_eq!(first, width >= threshold);
    }

    #[test]
    fn prop_literal_matches_exact_authored_text(keyword in prop_oneof![
        Just("block"), Just("flex"), Just("grid"), Just("inline-block"), Just("none"),
    ]) {
        let doc = render(CARD, &format!("#card {{ display: {keyword}; }}"));
        prop_assert!(holds(&doc, Requirement::literal("#card", "display", keyword).exact()));
        prop_assert!(!holds(&doc, Requirement::literal("#card", "display", "table").exact()));
    }
}
