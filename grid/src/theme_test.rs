use super::*;

#[test]
fn default_theme_is_day() {
    assert_eq!(Theme::default(), Theme::Day);
}

#[test]
fn next_cycles_through_all_themes() {
    assert_eq!(Theme::Day.next(), Theme::Night);
    assert_eq!(Theme::Night.next(), Theme::Rain);
    assert_eq!(Theme::Rain.next(), Theme::Snowy);
    assert_eq!(Theme::Snowy.next(), Theme::Day);
}

#[test]
fn full_cycle_returns_to_start() {
    let mut theme = Theme::Rain;
    for _ in 0..Theme::ALL.len() {
        theme = theme.next();
    }
    assert_eq!(theme, Theme::Rain);
}

#[test]
fn day_has_sun_clouds_and_birds() {
    let spec = Theme::Day.spec();
    assert_eq!(spec.celestial, Some(Celestial::Sun));
    assert_eq!(
        spec.layers,
        &[Layer { kind: Decoration::Cloud, count: 7 }, Layer { kind: Decoration::Bird, count: 3 }]
    );
}

#[test]
fn night_has_moon_and_stars() {
    let spec = Theme::Night.spec();
    assert_eq!(spec.celestial, Some(Celestial::Moon));
    assert!(spec.layers.iter().any(|l| l.kind == Decoration::Star && l.count == 80));
    assert!(spec.layers.iter().any(|l| l.kind == Decoration::ShootingStar && l.count == 2));
}

#[test]
fn weather_themes_have_no_celestial_body() {
    assert_eq!(Theme::Rain.spec().celestial, None);
    assert_eq!(Theme::Snowy.spec().celestial, None);
}

#[test]
fn every_theme_has_distinct_background() {
    for (i, a) in Theme::ALL.iter().enumerate() {
        for b in &Theme::ALL[i + 1..] {
            assert_ne!(a.spec().background, b.spec().background);
        }
    }
}

#[test]
fn disabling_animations_hides_layers_but_keeps_spec() {
    assert!(Theme::Rain.active_layers(false).is_empty());
    assert_eq!(Theme::Rain.active_layers(true).len(), 1);
    assert_eq!(Theme::Day.spec().celestial, Some(Celestial::Sun));
}

#[test]
fn names_parse_and_display() {
    for theme in Theme::ALL {
        assert_eq!(theme.to_string().parse::<Theme>(), Ok(theme));
    }
    assert_eq!("foggy".parse::<Theme>(), Err(UnknownTheme("foggy".into())));
}

#[test]
fn serde_uses_lowercase_names() {
    assert_eq!(serde_json::to_string(&Theme::Snowy).unwrap(), "\"snowy\"");
    assert_eq!(serde_json::from_str::<Theme>("\"night\"").unwrap(), Theme::Night);
}
