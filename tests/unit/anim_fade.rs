use super::*;

#[test]
fn fade_in_reaches_full_opacity_and_completes_once() {
    let mut tl = Timelines::new(Ease::Linear);
    let id = tl.fade_in(Element::WelcomeScreen, 900, Display::Flex);
    assert_eq!(tl.opacity(Element::WelcomeScreen), 0.0);
    assert_eq!(tl.display(Element::WelcomeScreen), Some(Display::Flex));

    assert!(tl.advance(450.0).is_empty());
    assert!((tl.opacity(Element::WelcomeScreen) - 0.5).abs() < 1e-9);

    assert_eq!(tl.advance(500.0), vec![id]);
    assert_eq!(tl.opacity(Element::WelcomeScreen), 1.0);
    assert!(tl.advance(16.0).is_empty());
    assert_eq!(tl.running(), 0);
}

#[test]
fn independent_timelines_complete_on_their_own_schedule() {
    let mut tl = Timelines::new(Ease::Linear);
    let fade = tl.fade_out(Element::Preloader, 900);
    let audio = tl.fade_audio_in(Element::AmbientTrack, 2000, 0.5);

    assert_eq!(tl.advance(1000.0), vec![fade]);
    assert!((tl.volume(Element::AmbientTrack) - 0.25).abs() < 1e-9);
    assert_eq!(tl.advance(1000.0), vec![audio]);
    assert!((tl.volume(Element::AmbientTrack) - 0.5).abs() < 1e-9);
}

#[test]
fn audio_fade_out_starts_from_current_volume() {
    let mut tl = Timelines::new(Ease::Linear);
    tl.fade_audio_in(Element::AmbientTrack, 100, 0.5);
    tl.advance(100.0);

    let out = tl.fade_audio_out(Element::AmbientTrack, 200);
    tl.advance(100.0);
    assert!((tl.volume(Element::AmbientTrack) - 0.25).abs() < 1e-9);
    assert_eq!(tl.advance(100.0), vec![out]);
    assert_eq!(tl.volume(Element::AmbientTrack), 0.0);
}

#[test]
fn zero_duration_completes_on_next_advance() {
    let mut tl = Timelines::new(Ease::InOutQuad);
    let id = tl.fade_out(Element::ScreenMask, 0);
    assert_eq!(tl.advance(0.0), vec![id]);
    assert_eq!(tl.opacity(Element::ScreenMask), 0.0);
}

#[test]
fn newer_timeline_supersedes_same_channel() {
    let mut tl = Timelines::new(Ease::Linear);
    let first = tl.fade_in(Element::ScreenMask, 1000, Display::Block);
    tl.advance(500.0);
    let second = tl.fade_out(Element::ScreenMask, 500);

    let done = tl.advance(500.0);
    assert_eq!(done, vec![second]);
    assert!(!done.contains(&first));
    assert_eq!(tl.opacity(Element::ScreenMask), 0.0);
}

#[test]
fn screen_mask_starts_hidden_and_other_elements_visible() {
    let mut tl = Timelines::new(Ease::Linear);
    assert_eq!(tl.opacity(Element::ScreenMask), 0.0);
    assert_eq!(tl.opacity(Element::Preloader), 1.0);

    tl.fade_in(Element::ScreenMask, 200, Display::Flex);
    tl.advance(100.0);
    assert!((tl.opacity(Element::ScreenMask) - 0.5).abs() < 1e-9);
}
