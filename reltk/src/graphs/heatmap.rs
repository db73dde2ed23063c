use std::path::Path as FsPath;

use svg::node::element::{Element, Rectangle};
use svg::node::Text;
use svg::Document;
use svg::Node;

use crate::args::GraphArgs;
use crate::error::Error;
use crate::estimator::RelatednessMatrix;

/// Relatedness matrix drawn as a grid of cells, rows and columns in label order
#[derive(Debug)]
pub struct Heatmap<'a> {
    pub document: Document,
    pub s: GraphArgs,
    pub matrix: &'a RelatednessMatrix,
    cell_size: f32,
    label_margin: f32,
    btm_padding: f32,
}

impl<'a> Heatmap<'a> {
    pub fn new(matrix: &'a RelatednessMatrix, s: GraphArgs) -> Self {
        let document = Document::new()
            .set("viewBox", (0, 0, s.width, s.height))
            .set("style", format!("background-color:{}", s.background_color));

        Self {
            document,
            matrix,
            cell_size: 0.0,
            label_margin: s.width * 0.12,
            btm_padding: s.height * 0.03,
            s,
        }
    }

    pub fn draw_graph(&mut self) {
        let matrix = self.matrix;
        let n = matrix.nsamples().max(1) as f32;
        let available = (self.s.width - self.label_margin)
            .min(self.s.height - self.label_margin - self.btm_padding);
        self.cell_size = available / n;

        for ((row, col), value) in matrix.values().indexed_iter() {
            self.create_box(row, col, *value);
        }

        for (idx, label) in matrix.labels().iter().enumerate() {
            self.draw_label(idx, label);
        }

        self.draw_bottom_margin();
    }

    /// Set cells are colored with an opacity equal to the estimate clamped to 0..=1
    pub fn create_box(&mut self, row: usize, col: usize, value: f64) {
        let (fill, opacity) = match value.is_nan() {
            true => (self.s.unset_color.clone(), 1.0),
            false => (self.s.color.clone(), value.clamp(0.0, 1.0)),
        };

        let rect = Rectangle::new()
            .set("x", self.label_margin + col as f32 * self.cell_size)
            .set("y", self.label_margin + row as f32 * self.cell_size)
            .set("width", self.cell_size)
            .set("height", self.cell_size)
            .set("fill", fill)
            .set("fill-opacity", opacity)
            .set("stroke", self.s.background_color.clone())
            .set("stroke-width", (self.cell_size * 0.02).max(0.5));

        self.document.append(rect);
    }

    fn draw_label(&mut self, idx: usize, label: &str) {
        let middle = self.label_margin + (idx as f32 + 0.5) * self.cell_size;

        let mut element = Element::new("text");
        element.assign("x", self.label_margin * 0.95);
        element.assign("y", middle);
        element.assign("fill", "black");
        element.assign("text-anchor", "end");
        element.assign("dominant-baseline", "middle");
        element.assign("font-size", format!("{}px", self.s.font_size));
        element.append(Text::new(label));
        self.document.append(element);

        let (x, y) = (middle, self.label_margin * 0.95);
        let mut element = Element::new("text");
        element.assign("x", x);
        element.assign("y", y);
        element.assign("fill", "black");
        element.assign("dominant-baseline", "middle");
        element.assign("transform", format!("rotate(-90 {x} {y})"));
        element.assign("font-size", format!("{}px", self.s.font_size));
        element.append(Text::new(label));
        self.document.append(element);
    }

    pub fn draw_bottom_margin(&mut self) {
        let y = self.s.height - self.btm_padding / 3.;
        let n = self.matrix.nsamples();
        let unset = self.matrix.nunset();

        for (x, text) in [
            (0.02, format!("samples: {n}")),
            (0.35, format!("estimates: {}", n * n - unset)),
            (0.70, format!("unset: {unset}")),
        ] {
            let mut element = Element::new("text");
            element.assign("x", self.s.width * x);
            element.assign("y", y);
            element.assign("fill", "black");
            element.assign("font-size", format!("{}px", self.s.font_size));
            element.append(Text::new(text));
            self.document.append(element);
        }
    }

    pub fn save(&self, path: &FsPath) -> Result<(), Error> {
        svg::save(path, &self.document).map_err(|e| Error::io(path, e))
    }
}
