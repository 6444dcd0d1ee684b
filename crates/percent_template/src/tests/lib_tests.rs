use super::*;

fn bind(source: &str, values: Values, mode: RenderMode) -> TemplateBinder<MemorySurface> {
    TemplateBinder::new(Some(MemorySurface::new(source)), values, mode)
}

#[test]
fn renders_stage_example() {
    let template = Template::parse("Stage: %STAGE% (%IDX%/%TOTAL%)");
    let values = Values::from([("STAGE", "Jungle"), ("IDX", "2"), ("TOTAL", "5")]);
    assert_eq!(template.render(&values), "Stage: Jungle (2/5)");
}

#[test]
fn render_is_deterministic() {
    let template = Template::parse("%A% and %B% and %A%");
    let values = Values::from([("A", "x"), ("B", "y")]);
    let first = template.render(&values);
    assert_eq!(first, template.render(&values));
    assert_eq!(first, "x and y and x");
}

#[test]
fn segment_zero_is_always_literal() {
    let template = Template::parse("%NAME% rules");
    assert_eq!(template.segments()[0], "");
    assert_eq!(template.segments()[1], "NAME");
    assert_eq!(template.placeholders(), vec!["NAME"]);
}

#[test]
fn empty_placeholder_renders_a_percent_sign() {
    let template = Template::parse("Progress 100%% done");
    assert_eq!(template.render(&Values::new()), "Progress 100% done");

    let trailing = Template::parse("100%%");
    assert_eq!(trailing.render(&Values::new()), "100%");
}

#[test]
fn unmatched_trailing_delimiter_is_kept() {
    let template = Template::parse("100%");
    assert_eq!(template.render(&Values::new()), "100%");
}

#[test]
fn missing_value_renders_empty() {
    let template = Template::parse("Weapon: %WEAPON%!");
    assert_eq!(template.render(&Values::new()), "Weapon: !");
}

#[test]
fn substituted_values_are_not_rescanned() {
    let template = Template::parse("%A%");
    let values = Values::from([("A", "%B%"), ("B", "nested")]);
    assert_eq!(template.render(&values), "%B%");
}

#[test]
fn rendering_original_placeholder_text_reconstructs_source() {
    let source = "Stage: %STAGE% (%IDX%/%TOTAL%)";
    let template = Template::parse(source);
    let values: Values = template
        .placeholders()
        .into_iter()
        .map(|name| (name.to_string(), format!("%{name}%")))
        .collect();
    assert_eq!(template.render(&values), source);
}

#[test]
fn placeholders_are_distinct_and_ordered() {
    let template = Template::parse("%B% %A% %B% %%");
    assert_eq!(template.placeholders(), vec!["B", "A"]);
}

#[test]
fn construct_performs_initial_render() {
    let binder = bind(
        "Available weapons: %WEAPON_COUNT%",
        Values::from([("WEAPON_COUNT", "12")]),
        RenderMode::Text,
    );
    assert_eq!(binder.rendered().as_deref(), Some("Available weapons: 12"));
    assert_eq!(binder.surface().map(MemorySurface::writes), Some(1));
}

#[test]
fn construct_without_surface_has_empty_template() {
    let mut binder: TemplateBinder<MemorySurface> = TemplateBinder::unbound(RenderMode::Markup);
    assert_eq!(binder.template().render(&Values::new()), "");
    assert!(!binder.update(Values::from([("A", "b")])));
    assert_eq!(binder.rendered(), None);
    assert_eq!(binder.values().get("A"), Some("b"));
}

#[test]
fn update_merges_values() {
    let mut binder = bind(
        "%STAGE% %IDX%",
        Values::from([("STAGE", "Forest"), ("IDX", "1")]),
        RenderMode::Text,
    );
    assert!(binder.update(Values::from([("IDX", "2")])));
    assert_eq!(binder.rendered().as_deref(), Some("Forest 2"));
    assert_eq!(binder.values().get("STAGE"), Some("Forest"));
    assert_eq!(binder.values().get("IDX"), Some("2"));
}

#[test]
fn update_skips_write_when_content_is_unchanged() {
    let mut binder = bind("Action: %ACTION%", Values::new(), RenderMode::Text);
    assert!(binder.update(Values::from([("ACTION", "Open")])));
    let writes = binder.surface().map(MemorySurface::writes);

    assert!(!binder.update(Values::from([("ACTION", "Open")])));
    assert!(!binder.update(Values::new()));
    assert_eq!(binder.surface().map(MemorySurface::writes), writes);
    assert_eq!(binder.rendered().as_deref(), Some("Action: Open"));
}

#[test]
fn markup_mode_keeps_tags_and_text_mode_drops_them() {
    let markup = bind(
        "<b>%NAME%</b>",
        Values::from([("NAME", "Volcano")]),
        RenderMode::Markup,
    );
    assert_eq!(
        markup.surface().map(MemorySurface::markup),
        Some("<b>Volcano</b>")
    );

    let text = bind(
        "<b>%NAME%</b>",
        Values::from([("NAME", "Volcano")]),
        RenderMode::Text,
    );
    assert_eq!(text.surface().map(MemorySurface::markup), Some("Volcano"));
}

#[test]
fn text_mode_escapes_markup_characters() {
    let binder = bind("%V%", Values::from([("V", "a < b & c")]), RenderMode::Text);
    let surface = binder.surface().expect("surface");
    assert_eq!(surface.markup(), "a &lt; b &amp; c");
    assert_eq!(surface.text(), "a < b & c");
}

#[test]
fn reassigning_surface_rederives_template() {
    let mut binder = bind("Old %X%", Values::from([("X", "1")]), RenderMode::Text);
    let previous = binder.set_surface(Some(MemorySurface::new("New %X%")));
    assert_eq!(previous.map(|s| s.text()).as_deref(), Some("Old 1"));
    assert_eq!(binder.rendered().as_deref(), Some("New 1"));
}

#[test]
fn reassigning_mode_rereads_surface_through_new_accessor() {
    let surface = MemorySurface::new("<i>%X%</i>");
    let mut binder = TemplateBinder::new(Some(surface), Values::new(), RenderMode::Markup);
    assert_eq!(binder.template().placeholders(), vec!["X"]);
    binder.update(Values::from([("X", "<u>y</u>")]));

    binder.set_mode(RenderMode::Text);
    assert_eq!(binder.template().segments(), &["y".to_string()]);
    assert_eq!(binder.rendered().as_deref(), Some("y"));
}
