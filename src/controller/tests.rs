use super::*;
use crate::dom::selector::{LINKS, PARAGRAPHS};
use crate::dom::{SelectorSet, Viewport};
use crate::settings::{KEY_ENABLED, SettingsStore};
use crate::speech::testing::RecordingBackend;
use async_trait::async_trait;
use std::time::Duration;

const PAGE: &str = r#"<html><body>
    <nav><a href="/home">Home page</a></nav>
    <main>
      <h1>Field notes</h1>
      <p id="first">The river was high. Birds were loud. We left early.</p>
      <p id="second">A quiet <span>afternoon</span> followed.</p>
      <img src="/media/sunset-beach.jpg">
      <img src="/media/fox.png" alt="A red fox asleep">
      <button>Subscribe now</button>
    </main>
    <footer>Written in spring</footer>
</body></html>"#;

struct FixedDescriber(&'static str);

#[async_trait]
impl ImageDescriber for FixedDescriber {
    async fn describe(&self, _image: ImageSource) -> String {
        self.0.to_string()
    }
}

struct Harness {
    controller: Controller,
    doc: Document,
    backend: RecordingBackend,
}

impl Harness {
    fn new(page: &str) -> Self {
        Self::with_describer(page, Arc::new(crate::describe::FilenameDescriber))
    }

    fn with_describer(page: &str, describer: Arc<dyn ImageDescriber>) -> Self {
        let backend = RecordingBackend::default();
        let speech = SpeechDispatcher::new(
            Box::new(backend.clone()),
            SettingsStore::default(),
            Duration::from_millis(200),
        );
        let controller = Controller::new(&AppConfig::default(), speech, describer);
        Self {
            controller,
            doc: Document::parse(page, Viewport::new(800.0, 120.0))
                .with_base_url(url::Url::parse("https://notes.example/").unwrap()),
            backend,
        }
    }

    async fn press(&mut self, chord: &str) -> Disposition {
        let press: KeyPress = chord.parse().unwrap();
        self.controller.handle_key(&mut self.doc, &press).await
    }

    async fn click(&mut self, selector: &str) -> Disposition {
        let target = self
            .doc
            .query_first(&SelectorSet::parse(selector).unwrap())
            .unwrap();
        self.controller.handle_click(&mut self.doc, target).await
    }

    /// Let pending debounced speech fire.
    async fn settle(&self) {
        tokio::time::sleep(Duration::from_millis(250)).await;
    }

    fn spoken(&self) -> Vec<String> {
        self.backend.spoken()
    }

    fn focus_label(&self) -> Option<String> {
        self.controller.snapshot(&self.doc).focus_label
    }
}

#[tokio::test(start_paused = true)]
async fn toggling_twice_announces_each_mode() {
    let mut h = Harness::new(PAGE);
    assert_eq!(h.press("ctrl+space").await, Disposition::Consumed);
    assert_eq!(h.controller.mode(), Mode::Typing);
    assert_eq!(h.press("ctrl+space").await, Disposition::Consumed);
    assert_eq!(h.controller.mode(), Mode::Browse);
    assert_eq!(h.spoken(), vec!["Typing mode", "Browse mode"]);
}

#[tokio::test(start_paused = true)]
async fn typing_mode_passes_everything_through() {
    let mut h = Harness::new(PAGE);
    h.press("ctrl+space").await;
    assert_eq!(h.press("p").await, Disposition::PassThrough);
    assert_eq!(h.press("arrowdown").await, Disposition::PassThrough);
    assert_eq!(h.click("#first").await, Disposition::PassThrough);
    h.settle().await;
    assert_eq!(h.spoken(), vec!["Typing mode"]);
    assert_eq!(h.focus_label(), None);
}

#[tokio::test(start_paused = true)]
async fn unbound_keys_pass_through() {
    let mut h = Harness::new(PAGE);
    assert_eq!(h.press("z").await, Disposition::PassThrough);
    assert_eq!(h.press("ctrl+p").await, Disposition::PassThrough);
}

#[tokio::test(start_paused = true)]
async fn paragraph_navigation_focuses_highlights_and_wraps() {
    let mut h = Harness::new(PAGE);
    assert_eq!(h.press("p").await, Disposition::Consumed);
    h.settle().await;
    let first = h.doc.query_first(&PARAGRAPHS).unwrap();
    let snapshot = h.controller.snapshot(&h.doc);
    assert_eq!(snapshot.focus, Some(first));
    assert_eq!(
        h.controller.session().highlighter().marker().map(|m| m.element),
        Some(first)
    );

    h.press("P").await;
    h.settle().await;
    assert_eq!(h.focus_label().as_deref(), Some("A quiet afternoon followed."));

    h.press("p").await;
    h.settle().await;
    assert_eq!(
        h.spoken(),
        vec![
            "The river was high. Birds were loud. We left early.",
            "A quiet afternoon followed.",
            "The river was high. Birds were loud. We left early.",
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn rapid_navigation_only_speaks_the_last_target() {
    let mut h = Harness::new(PAGE);
    h.press("p").await;
    h.press("p").await;
    h.settle().await;
    assert_eq!(h.spoken(), vec!["A quiet afternoon followed."]);
}

#[tokio::test(start_paused = true)]
async fn navigation_scrolls_the_target_into_view() {
    let mut h = Harness::new(PAGE);
    h.press("b").await;
    let button = h.controller.snapshot(&h.doc).focus.unwrap();
    // Centering the button would overshoot, so scrolling stops at the end.
    assert_eq!(h.doc.viewport().scroll_y, 332.0);
    assert_eq!(h.doc.client_rect(button).unwrap().y, 64.0);
    assert_eq!(
        h.controller.snapshot(&h.doc).highlight.map(|rect| rect.y),
        Some(64.0)
    );
}

#[tokio::test(start_paused = true)]
async fn link_navigation_moves_the_highlight_between_list_items() {
    let page = r#"<html><body><ul>
        <li><a href="/one">Chapter one</a></li>
        <li><a href="/two">Chapter two</a></li>
        <li><a href="/three">Chapter three</a></li>
    </ul></body></html>"#;
    let mut h = Harness::new(page);
    let mut tops = Vec::new();
    for _ in 0..3 {
        h.press("l").await;
        let focus = h.controller.snapshot(&h.doc).focus.unwrap();
        tops.push(h.doc.bounding_box(focus).unwrap().y);
    }
    assert_eq!(tops, vec![0.0, 24.0, 48.0]);
}

#[tokio::test(start_paused = true)]
async fn heading_link_and_button_navigation() {
    let mut h = Harness::new(PAGE);
    h.press("h").await;
    assert_eq!(h.focus_label().as_deref(), Some("Field notes"));
    h.press("l").await;
    assert_eq!(h.focus_label().as_deref(), Some("Home page"));
    h.press("b").await;
    assert_eq!(h.focus_label().as_deref(), Some("Subscribe now"));
}

#[tokio::test(start_paused = true)]
async fn silent_when_no_paragraph_exists() {
    let mut h = Harness::new("<html><body><h1>Title only</h1></body></html>");
    assert_eq!(h.press("p").await, Disposition::Consumed);
    h.settle().await;
    assert!(h.spoken().is_empty());
}

#[tokio::test(start_paused = true)]
async fn landmark_navigation_cycles_and_reports_absence() {
    let mut h = Harness::new(PAGE);
    h.press("d").await;
    assert_eq!(h.controller.snapshot(&h.doc).focus_tag.as_deref(), Some("nav"));
    h.press("d").await;
    assert_eq!(h.controller.snapshot(&h.doc).focus_tag.as_deref(), Some("main"));
    h.press("d").await;
    assert_eq!(h.controller.snapshot(&h.doc).focus_tag.as_deref(), Some("footer"));

    let mut bare = Harness::new("<html><body><p>No regions here.</p></body></html>");
    bare.press("d").await;
    assert_eq!(bare.spoken(), vec![NO_MORE_LANDMARKS]);
}

#[tokio::test(start_paused = true)]
async fn skip_to_main_focuses_and_aligns_to_top() {
    let mut h = Harness::new(PAGE);
    h.press("b").await;
    assert!(h.doc.viewport().scroll_y > 0.0);
    h.press("m").await;
    assert_eq!(h.spoken(), vec![MAIN_CONTENT]);
    let snapshot = h.controller.snapshot(&h.doc);
    assert_eq!(snapshot.focus_tag.as_deref(), Some("main"));
    // The nav line sits above main.
    assert_eq!(snapshot.scroll_y, 24.0);
    assert_eq!(snapshot.sentence_index, 0);
}

#[tokio::test(start_paused = true)]
async fn skip_to_main_accepts_role_and_reports_absence() {
    let mut h = Harness::new(
        r#"<html><body><div role="main"><p>Role based main.</p></div></body></html>"#,
    );
    h.press("m").await;
    assert_eq!(h.controller.snapshot(&h.doc).focus_tag.as_deref(), Some("div"));

    let mut missing = Harness::new("<html><body><p>Nothing central.</p></body></html>");
    missing.press("m").await;
    assert_eq!(missing.spoken(), vec![MAIN_CONTENT_NOT_FOUND]);
    assert_eq!(missing.focus_label(), None);
}

#[tokio::test(start_paused = true)]
async fn images_use_alt_text_or_a_generated_description() {
    let mut h = Harness::new(PAGE);
    h.press("g").await;
    h.settle().await;
    assert_eq!(
        h.spoken(),
        vec![GENERATING_DESCRIPTION, "Image: sunset beach"]
    );

    h.press("g").await;
    h.settle().await;
    assert_eq!(h.spoken().last().map(String::as_str), Some("A red fox asleep"));
    assert_eq!(h.controller.snapshot(&h.doc).focus_tag.as_deref(), Some("img"));
}

#[tokio::test(start_paused = true)]
async fn injected_describer_is_used() {
    let mut h = Harness::with_describer(PAGE, Arc::new(FixedDescriber("A beach at dusk")));
    h.press("g").await;
    h.settle().await;
    assert_eq!(h.spoken(), vec![GENERATING_DESCRIPTION, "A beach at dusk"]);
}

#[tokio::test(start_paused = true)]
async fn missing_images_are_reported() {
    let mut h = Harness::new("<html><body><p>Text only page.</p></body></html>");
    h.press("g").await;
    assert_eq!(h.spoken(), vec![NO_IMAGES_FOUND]);
}

#[tokio::test(start_paused = true)]
async fn sentence_navigation_steps_through_the_focused_paragraph() {
    let mut h = Harness::new(PAGE);
    h.press("arrowdown").await;
    h.settle().await;
    assert!(h.spoken().is_empty());

    h.press("p").await;
    h.settle().await;
    for _ in 0..4 {
        h.press("arrowdown").await;
        h.settle().await;
    }
    h.press("arrowup").await;
    h.settle().await;

    let spoken = h.spoken();
    assert_eq!(
        &spoken[1..],
        &[
            "The river was high.",
            "Birds were loud.",
            "We left early.",
            "Birds were loud.",
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn backward_then_forward_at_the_first_sentence() {
    let mut h = Harness::new(PAGE);
    h.press("p").await;
    h.press("down").await;
    h.settle().await;
    h.press("up").await;
    h.settle().await;
    h.press("down").await;
    h.settle().await;
    assert_eq!(
        h.spoken(),
        vec!["The river was high.", "The river was high.", "Birds were loud."]
    );
    assert_eq!(h.controller.snapshot(&h.doc).sentence_index, 2);
}

#[tokio::test(start_paused = true)]
async fn moving_focus_resets_the_sentence_cursor() {
    let mut h = Harness::new(PAGE);
    h.press("p").await;
    h.press("arrowdown").await;
    h.press("arrowdown").await;
    assert_eq!(h.controller.snapshot(&h.doc).sentence_index, 2);
    h.press("d").await;
    assert_eq!(h.controller.snapshot(&h.doc).sentence_index, 0);
}

#[tokio::test(start_paused = true)]
async fn sentence_steps_pick_up_edited_text() {
    let mut h = Harness::new(PAGE);
    h.press("p").await;
    h.press("arrowdown").await;
    let first = h.doc.query_first(&PARAGRAPHS).unwrap();
    h.doc
        .set_text(first, "The river was high. Then it rained. Hard.");
    h.press("arrowdown").await;
    h.settle().await;
    assert_eq!(h.spoken(), vec!["Then it rained."]);
}

#[tokio::test(start_paused = true)]
async fn removed_focus_restarts_from_the_first_match() {
    let mut h = Harness::new(PAGE);
    h.press("p").await;
    h.press("p").await;
    let second = h.controller.snapshot(&h.doc).focus.unwrap();
    h.doc.remove(second);
    assert_eq!(h.press("arrowdown").await, Disposition::Consumed);
    h.press("p").await;
    h.settle().await;
    assert_eq!(
        h.focus_label().as_deref(),
        Some("The river was high. Birds were loud. We left early.")
    );
}

#[tokio::test(start_paused = true)]
async fn click_selects_the_nearest_narratable_element() {
    let mut h = Harness::new(PAGE);
    assert_eq!(h.click("span").await, Disposition::Consumed);
    h.settle().await;
    assert_eq!(h.focus_label().as_deref(), Some("A quiet afternoon followed."));
    assert_eq!(h.spoken(), vec!["A quiet afternoon followed."]);

    let link = h.doc.query_first(&LINKS).unwrap();
    assert_eq!(h.click("a").await, Disposition::Consumed);
    assert_eq!(h.controller.snapshot(&h.doc).focus, Some(link));

    assert_eq!(h.click("footer").await, Disposition::PassThrough);
}

#[tokio::test(start_paused = true)]
async fn disabled_settings_silence_all_narration() {
    let mut h = Harness::new(PAGE);
    h.controller
        .speech()
        .settings()
        .apply(KEY_ENABLED, &toml::Value::Boolean(false))
        .unwrap();
    h.press("ctrl+space").await;
    h.press("ctrl+space").await;
    h.press("p").await;
    h.press("g").await;
    h.settle().await;
    assert!(h.spoken().is_empty());
    assert!(h.focus_label().is_some());
}
