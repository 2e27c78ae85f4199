use chrono::Utc;

use crate::{
    composition::model::{Element, ElementKind, ElementType, Project},
    foundation::{
        core::{AspectRatio, Point, Size},
        error::{SignageError, SignageResult},
    },
};

/// Offset applied to a duplicated element so it does not sit exactly on its source.
pub const DUPLICATE_OFFSET: f64 = 20.0;

#[derive(Clone, Debug, Default, PartialEq)]
/// Partial element update; `None` fields are left untouched.
pub struct ElementPatch {
    /// New top-left corner.
    pub position: Option<Point>,
    /// New extent.
    pub size: Option<Size>,
    /// New stacking order.
    pub z_index: Option<i32>,
    /// Replacement content. Must keep the element's type.
    pub kind: Option<ElementKind>,
}

/// Position a newly added element is placed at.
pub fn default_position() -> Point {
    Point::new(100.0, 100.0)
}

/// Size a newly added element of `ty` starts with.
pub fn default_size(ty: ElementType) -> Size {
    match ty {
        ElementType::Ticker => Size::new(600.0, 60.0),
        _ => Size::new(300.0, 200.0),
    }
}

impl Project {
    /// Append an element with a generated id on top of the current stack.
    pub fn add_element(
        &mut self,
        kind: ElementKind,
        position: Point,
        size: Size,
    ) -> SignageResult<String> {
        let element = Element {
            id: uuid::Uuid::new_v4().to_string(),
            position,
            size,
            z_index: self.next_z_index(),
            kind,
        };
        element.validate()?;
        let id = element.id.clone();
        self.elements.push(element);
        self.touch();
        Ok(id)
    }

    /// Append an element of `ty` with the authoring tool's default content and geometry.
    pub fn add_default_element(&mut self, ty: ElementType) -> SignageResult<String> {
        self.add_element(ElementKind::default_for(ty), default_position(), default_size(ty))
    }

    /// Apply a partial update. The element is left unchanged if the result is invalid.
    pub fn update_element(&mut self, id: &str, patch: ElementPatch) -> SignageResult<()> {
        let element = self.element_mut(id)?;
        let mut updated = element.clone();
        if let Some(position) = patch.position {
            updated.position = position;
        }
        if let Some(size) = patch.size {
            updated.size = size;
        }
        if let Some(z) = patch.z_index {
            updated.z_index = z;
        }
        if let Some(kind) = patch.kind {
            if kind.element_type() != updated.element_type() {
                return Err(SignageError::validation(format!(
                    "element '{id}' cannot change type from {} to {}",
                    updated.element_type(),
                    kind.element_type()
                )));
            }
            updated.kind = kind;
        }
        updated.validate()?;
        *element = updated;
        self.touch();
        Ok(())
    }

    pub fn remove_element(&mut self, id: &str) -> SignageResult<Element> {
        let idx = self
            .elements
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| SignageError::not_found(format!("element '{id}'")))?;
        let removed = self.elements.remove(idx);
        self.touch();
        Ok(removed)
    }

    /// Copy an element under a new id, shifted down-right and placed on top.
    pub fn duplicate_element(&mut self, id: &str) -> SignageResult<String> {
        let source = self
            .element(id)
            .ok_or_else(|| SignageError::not_found(format!("element '{id}'")))?;
        let copy = Element {
            id: uuid::Uuid::new_v4().to_string(),
            position: Point::new(
                source.position.x + DUPLICATE_OFFSET,
                source.position.y + DUPLICATE_OFFSET,
            ),
            z_index: self.next_z_index(),
            ..source.clone()
        };
        let new_id = copy.id.clone();
        self.elements.push(copy);
        self.touch();
        Ok(new_id)
    }

    pub fn bring_to_front(&mut self, id: &str) -> SignageResult<()> {
        let max = self.elements.iter().map(|e| e.z_index).max().unwrap_or(0);
        self.element_mut(id)?.z_index = max.saturating_add(1);
        self.touch();
        Ok(())
    }

    pub fn send_to_back(&mut self, id: &str) -> SignageResult<()> {
        let min = self.elements.iter().map(|e| e.z_index).min().unwrap_or(0);
        self.element_mut(id)?.z_index = min.saturating_sub(1);
        self.touch();
        Ok(())
    }

    pub fn clear_elements(&mut self) {
        self.elements.clear();
        self.touch();
    }

    /// Switch the canvas to another preset. Element geometry is kept as authored.
    pub fn set_ratio(&mut self, ratio: &AspectRatio) {
        self.ratio = ratio.label.to_string();
        self.canvas_width = ratio.width;
        self.canvas_height = ratio.height;
        self.touch();
    }

    fn element_mut(&mut self, id: &str) -> SignageResult<&mut Element> {
        self.elements
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| SignageError::not_found(format!("element '{id}'")))
    }

    fn next_z_index(&self) -> i32 {
        i32::try_from(self.elements.len()).unwrap_or(i32::MAX)
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/edit.rs"]
mod tests;
