//! Spotlight activation and teardown
//!
//! Activation runs synchronously inside `Spotlight::activate`:
//!
//! 1. The overlay is created, styled, appended to the body and given a click
//!    listener.
//! 2. Every identifier is resolved and its page offset and box size are
//!    captured. Nothing moves until all captures are done.
//! 3. Each placeholder is sized, marked and inserted right before its target,
//!    then the target is lifted to absolute positioning above the overlay.
//!
//! Teardown (overlay click or `remove`) runs at most once per instance.

use std::cell::RefCell;
use std::rc::Rc;

use crate::dom::Dom;
use crate::models::geometry::page_offset;
use crate::models::options::TARGET_Z_INDEX;
use crate::models::style::px;
use crate::models::{BoxSize, PageOffset, SpotlightOptions, StyleMap, TargetSpec};
use crate::spotlight::SpotlightError;

/// Invoked once, with no arguments, when the effect is dismissed
pub type DismissCallback = Box<dyn FnOnce()>;

/// Element lifted above the overlay, with its captured page offset
#[derive(Clone, Debug, PartialEq)]
pub struct TargetElement<N> {
    pub node: N,
    pub offset: PageOffset,
}

impl<N> TargetElement<N> {
    /// Absolute positioning at the captured offset, above the overlay
    pub fn lifted_style(&self) -> StyleMap {
        let mut style = StyleMap::new();
        style
            .set("position", "absolute")
            .set("top", px(self.offset.top))
            .set("left", px(self.offset.left))
            .set("z-index", TARGET_Z_INDEX.to_string());
        style
    }
}

/// Empty stand-in keeping a target's slot in normal flow
#[derive(Clone, Debug, PartialEq)]
pub struct Placeholder<N> {
    pub node: N,
    pub size: BoxSize,
}

impl<N> Placeholder<N> {
    pub fn style(&self) -> StyleMap {
        let mut style = StyleMap::new();
        style
            .set("width", px(self.size.width))
            .set("height", px(self.size.height));
        style
    }
}

#[derive(Debug)]
struct Highlight<N> {
    target: TargetElement<N>,
    placeholder: Placeholder<N>,
}

struct ActiveState<D: Dom> {
    overlay: D::Node,
    listener: Option<D::Listener>,
    highlights: Vec<Highlight<D::Node>>,
    on_dismiss: Option<DismissCallback>,
}

type SharedState<D> = Rc<RefCell<Option<ActiveState<D>>>>;

/// Partially applied activation, undone if a later step fails
struct Progress<D: Dom> {
    overlay: Option<D::Node>,
    listener: Option<D::Listener>,
    highlights: Vec<Highlight<D::Node>>,
    /// Targets whose styles may have been touched
    lifted: usize,
}

impl<D: Dom> Progress<D> {
    fn new() -> Self {
        Self {
            overlay: None,
            listener: None,
            highlights: Vec::new(),
            lifted: 0,
        }
    }

    fn rollback(self, dom: &D, placeholder_class: &str) {
        drop(self.listener);
        if let Some(overlay) = &self.overlay {
            dom.detach(overlay);
        }
        for highlight in &self.highlights {
            dom.detach(&highlight.placeholder.node);
        }
        for highlight in self.highlights.iter().take(self.lifted) {
            dom.clear_style(&highlight.target.node);
            dom.remove_class(&highlight.target.node, placeholder_class);
        }
    }
}

/// A single spotlight effect over a document
pub struct Spotlight<D: Dom> {
    dom: D,
    options: SpotlightOptions,
    state: SharedState<D>,
}

impl<D: Dom> Spotlight<D> {
    /// Show the overlay and lift every resolvable target above it.
    ///
    /// Identifiers that resolve to nothing are skipped with a warning. On a
    /// DOM failure everything applied so far is undone and `on_dismiss` is
    /// not called.
    pub fn activate(
        dom: D,
        targets: &TargetSpec,
        options: SpotlightOptions,
        on_dismiss: Option<DismissCallback>,
    ) -> Result<Self, SpotlightError> {
        let options = options.normalized();
        let state: SharedState<D> = Rc::new(RefCell::new(None));

        let mut progress = Progress::new();
        let overlay = match Self::apply(&dom, targets, &options, &state, &mut progress) {
            Ok(overlay) => overlay,
            Err(err) => {
                log::error!("spotlight activation failed, rolling back: {}", err);
                progress.rollback(&dom, &options.placeholder_class);
                return Err(err);
            }
        };

        let Progress {
            listener,
            highlights,
            ..
        } = progress;

        log::debug!(
            "spotlight active: {} of {} targets lifted",
            highlights.len(),
            targets.len()
        );
        *state.borrow_mut() = Some(ActiveState {
            overlay,
            listener,
            highlights,
            on_dismiss,
        });

        Ok(Self {
            dom,
            options,
            state,
        })
    }

    fn apply(
        dom: &D,
        targets: &TargetSpec,
        options: &SpotlightOptions,
        state: &SharedState<D>,
        progress: &mut Progress<D>,
    ) -> Result<D::Node, SpotlightError> {
        let overlay = dom.create_div()?;
        dom.set_id(&overlay, &options.overlay_id)?;
        dom.apply_style(&overlay, &options.overlay_style())?;
        dom.append_to_body(&overlay)?;
        progress.overlay = Some(overlay.clone());

        let handler_dom = dom.clone();
        let handler_state = Rc::clone(state);
        let placeholder_class = options.placeholder_class.clone();
        let listener = dom.listen_click(
            &overlay,
            Box::new(move || {
                log::debug!("overlay clicked");
                teardown(&handler_dom, &placeholder_class, &handler_state);
            }),
        )?;
        progress.listener = Some(listener);

        for id in targets.ids() {
            let Some(node) = dom.element_by_id(id) else {
                log::warn!("spotlight target '{}' not found, skipping", id);
                continue;
            };
            if node == overlay {
                log::warn!("spotlight target '{}' is the overlay itself, skipping", id);
                continue;
            }

            let offset = page_offset(dom.offset_chain(&node));
            let size = dom.box_size(&node);
            log::debug!(
                "captured '{}': top={} left={} width={} height={}",
                id,
                offset.top,
                offset.left,
                size.width,
                size.height
            );
            let placeholder = dom.create_div()?;
            progress.highlights.push(Highlight {
                target: TargetElement { node, offset },
                placeholder: Placeholder {
                    node: placeholder,
                    size,
                },
            });
        }

        for (index, highlight) in progress.highlights.iter().enumerate() {
            let placeholder = &highlight.placeholder;
            dom.add_class(&placeholder.node, &options.placeholder_class)?;
            dom.apply_style(&placeholder.node, &placeholder.style())?;
            dom.insert_before(&placeholder.node, &highlight.target.node)?;

            progress.lifted = index + 1;
            dom.apply_style(&highlight.target.node, &highlight.target.lifted_style())?;
        }

        Ok(overlay)
    }

    /// Dismiss the effect. Returns `false` if it was already dismissed.
    pub fn remove(&self) -> bool {
        teardown(&self.dom, &self.options.placeholder_class, &self.state)
    }

    pub fn is_active(&self) -> bool {
        self.state.borrow().is_some()
    }

    /// Number of lifted targets; equals the placeholder count. Zero once dismissed.
    pub fn target_count(&self) -> usize {
        self.state
            .borrow()
            .as_ref()
            .map(|active| active.highlights.len())
            .unwrap_or(0)
    }

    pub fn targets(&self) -> Vec<TargetElement<D::Node>> {
        self.state
            .borrow()
            .as_ref()
            .map(|active| active.highlights.iter().map(|h| h.target.clone()).collect())
            .unwrap_or_default()
    }

    pub fn placeholders(&self) -> Vec<Placeholder<D::Node>> {
        self.state
            .borrow()
            .as_ref()
            .map(|active| active.highlights.iter().map(|h| h.placeholder.clone()).collect())
            .unwrap_or_default()
    }

    pub fn overlay(&self) -> Option<D::Node> {
        self.state
            .borrow()
            .as_ref()
            .map(|active| active.overlay.clone())
    }

    pub fn options(&self) -> &SpotlightOptions {
        &self.options
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }
}

/// Take the active state out of `state` and undo the effect.
///
/// The cell is emptied before any DOM call or callback runs, so a click
/// arriving during teardown, or a callback calling `remove`, finds nothing
/// to do.
fn teardown<D: Dom>(dom: &D, placeholder_class: &str, state: &RefCell<Option<ActiveState<D>>>) -> bool {
    let Some(active) = state.borrow_mut().take() else {
        return false;
    };
    let ActiveState {
        overlay,
        listener,
        highlights,
        on_dismiss,
    } = active;

    dom.detach(&overlay);
    drop(listener);

    if let Some(callback) = on_dismiss {
        callback();
    }

    for highlight in &highlights {
        dom.detach(&highlight.placeholder.node);
    }
    for highlight in &highlights {
        dom.clear_style(&highlight.target.node);
        dom.remove_class(&highlight.target.node, placeholder_class);
    }

    log::debug!("spotlight dismissed, {} targets restored", highlights.len());
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDom;
    use crate::models::OffsetMetrics;

    fn page_with(ids: &[&str]) -> MemoryDom {
        let dom = MemoryDom::new();
        for (i, id) in ids.iter().enumerate() {
            dom.add_box(
                dom.body(),
                id,
                OffsetMetrics::new(20.0 * i as f64, 8.0, 0.0, 0.0),
                BoxSize { width: 100.0, height: 20.0 },
            )
            .unwrap();
        }
        dom
    }

    #[test]
    fn test_lifted_style() {
        let target = TargetElement {
            node: (),
            offset: PageOffset { top: 12.0, left: 7.5 },
        };
        assert_eq!(
            target.lifted_style().to_css_text(),
            "position: absolute; top: 12px; left: 7.5px; z-index: 90;"
        );
    }

    #[test]
    fn test_placeholder_style() {
        let placeholder = Placeholder {
            node: (),
            size: BoxSize { width: 100.0, height: 20.0 },
        };
        assert_eq!(placeholder.style().to_css_text(), "width: 100px; height: 20px;");
    }

    #[test]
    fn test_rollback_on_detached_target() {
        // The body has no parent, so inserting its placeholder fails.
        let dom = page_with(&["a"]);
        dom.set_id(&dom.body(), "page").unwrap();
        let before = dom.node_count();

        let result = Spotlight::activate(
            dom.clone(),
            &TargetSpec::from(&["a", "page"][..]),
            SpotlightOptions::default(),
            None,
        );

        assert!(matches!(result, Err(SpotlightError::Dom(_))));
        assert_eq!(dom.node_count(), before);
        assert_eq!(dom.element_by_id("overlay"), None);
        let a = dom.element_by_id("a").unwrap();
        assert_eq!(dom.style_attribute(a), None);
        assert_eq!(dom.style_attribute(dom.body()), None);
    }

    #[test]
    fn test_target_matching_overlay_id_skipped() {
        let dom = page_with(&["a"]);
        let spotlight = Spotlight::activate(
            dom.clone(),
            &TargetSpec::from(&["overlay", "a"][..]),
            SpotlightOptions::default(),
            None,
        )
        .unwrap();
        assert_eq!(spotlight.target_count(), 1);
    }
}
