use super::{
    Command, Controller, Effect, GENERATING_DESCRIPTION, MAIN_CONTENT, MAIN_CONTENT_NOT_FOUND,
    NO_IMAGES_FOUND, NO_MORE_LANDMARKS,
};
use crate::dom::selector::{
    BUTTONS, HEADINGS, IMAGES, LANDMARKS, LINKS, MAIN_ELEMENT, MAIN_ROLE, NARRATABLE, PARAGRAPHS,
};
use crate::dom::{Document, ElementId, ScrollAlign, SelectorSet};
use crate::label::extract_label;
use crate::navigator::{MIN_LABEL_CHARS, get_next, is_valid_element};
use tracing::{debug, info};

/// Narratable element a click on `target` selects, if any.
pub(super) fn click_target(doc: &Document, target: ElementId) -> Option<ElementId> {
    doc.closest(target, &NARRATABLE)
        .filter(|element| is_valid_element(doc, Some(*element)))
}

impl Controller {
    pub(super) fn reduce(&mut self, doc: &Document, command: Command) -> Vec<Effect> {
        let mut effects = Vec::new();

        match command {
            Command::ToggleMode => self.handle_toggle_mode(&mut effects),
            Command::NextParagraph => self.handle_sequence_step(doc, &PARAGRAPHS, None, &mut effects),
            Command::NextHeading => self.handle_sequence_step(doc, &HEADINGS, None, &mut effects),
            Command::NextLink => self.handle_sequence_step(doc, &LINKS, None, &mut effects),
            Command::NextButton => self.handle_sequence_step(doc, &BUTTONS, None, &mut effects),
            Command::NextLandmark => {
                self.handle_sequence_step(doc, &LANDMARKS, Some(NO_MORE_LANDMARKS), &mut effects)
            }
            Command::SkipToMain => self.handle_skip_to_main(doc, &mut effects),
            Command::NextImage => self.handle_next_image(doc, &mut effects),
            Command::NextSentence => self.handle_sentence_forward(doc, &mut effects),
            Command::PrevSentence => self.handle_sentence_backward(doc, &mut effects),
            Command::Select(element) => self.handle_select(doc, element, &mut effects),
        }

        effects
    }

    fn handle_toggle_mode(&mut self, effects: &mut Vec<Effect>) {
        let mode = self.session.toggle_mode();
        info!(%mode, "Mode toggled");
        effects.push(Effect::Speak(mode.announcement().to_string()));
    }

    fn focus_element(&mut self, element: ElementId, effects: &mut Vec<Effect>) {
        self.session.set_focus(element);
        effects.push(Effect::Highlight(element));
    }

    fn handle_sequence_step(
        &mut self,
        doc: &Document,
        selectors: &SelectorSet,
        none_found: Option<&str>,
        effects: &mut Vec<Effect>,
    ) {
        let current = self.session.focus(doc);
        let Some(next) = get_next(doc, selectors, current) else {
            debug!(selectors = %selectors, "Nothing to navigate to");
            if let Some(message) = none_found {
                effects.push(Effect::Speak(message.to_string()));
            }
            return;
        };
        self.focus_element(next, effects);
        effects.push(Effect::SpeakDebounced(extract_label(doc, next)));
        effects.push(Effect::ScrollIntoView {
            element: next,
            align: ScrollAlign::Center,
        });
    }

    fn handle_skip_to_main(&mut self, doc: &Document, effects: &mut Vec<Effect>) {
        let main = doc
            .query_first(&MAIN_ELEMENT)
            .or_else(|| doc.query_first(&MAIN_ROLE));
        let Some(main) = main else {
            effects.push(Effect::Speak(MAIN_CONTENT_NOT_FOUND.to_string()));
            return;
        };
        self.focus_element(main, effects);
        effects.push(Effect::Speak(MAIN_CONTENT.to_string()));
        effects.push(Effect::ScrollIntoView {
            element: main,
            align: ScrollAlign::Start,
        });
    }

    fn handle_next_image(&mut self, doc: &Document, effects: &mut Vec<Effect>) {
        let current = self.session.focus(doc);
        let Some(image) = get_next(doc, &IMAGES, current) else {
            effects.push(Effect::Speak(NO_IMAGES_FOUND.to_string()));
            return;
        };

        let alt = doc
            .attribute(image, "alt")
            .map(str::trim)
            .filter(|alt| alt.chars().count() >= MIN_LABEL_CHARS)
            .map(str::to_string);

        match alt {
            Some(alt) => {
                self.focus_element(image, effects);
                effects.push(Effect::SpeakDebounced(alt));
            }
            None => {
                effects.push(Effect::Speak(GENERATING_DESCRIPTION.to_string()));
                self.focus_element(image, effects);
                effects.push(Effect::DescribeImage(image));
            }
        }
        effects.push(Effect::ScrollIntoView {
            element: image,
            align: ScrollAlign::Center,
        });
    }

    fn handle_sentence_forward(&mut self, doc: &Document, effects: &mut Vec<Effect>) {
        let Some(focus) = self.session.focus(doc) else {
            return;
        };
        let label = extract_label(doc, focus);
        if let Some(sentence) = self.session.cursor_mut().step_forward(&label) {
            effects.push(Effect::SpeakDebounced(sentence));
        }
    }

    fn handle_sentence_backward(&mut self, doc: &Document, effects: &mut Vec<Effect>) {
        let Some(focus) = self.session.focus(doc) else {
            return;
        };
        let label = extract_label(doc, focus);
        if let Some(sentence) = self.session.cursor_mut().step_backward(&label) {
            effects.push(Effect::SpeakDebounced(sentence));
        }
    }

    fn handle_select(&mut self, doc: &Document, element: ElementId, effects: &mut Vec<Effect>) {
        self.focus_element(element, effects);
        effects.push(Effect::SpeakDebounced(extract_label(doc, element)));
    }
}
