use std::fmt;

use crate::app::{App, Session};

/// Read-only snapshot of an [`App`] for printing.
pub struct View<'a> {
    app: &'a App,
}

impl<'a> View<'a> {
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }

    fn fmt_logged_out(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let draft = self.app.draft();
        let masked = "*".repeat(draft.password().chars().count());

        for form in ["Login", "Register"] {
            writeln!(fmt, "{form}")?;
            writeln!(fmt, "  Username: {}", draft.username())?;
            writeln!(fmt, "  Password: {masked}")?;
        }
        Ok(())
    }

    fn fmt_gallery(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(fmt, "Image CRUD")?;

        if let Some(upload) = self.app.pending() {
            writeln!(fmt, "Selected File: {}", upload.name())?;
        }

        let rows: Vec<[String; 4]> = self
            .app
            .images()
            .iter()
            .map(|image| {
                [
                    self.app.resolve_thumbnail_url(&image.filename),
                    image.filename.clone(),
                    image.likes.to_string(),
                    image.id.to_string(),
                ]
            })
            .collect();

        // the id sits where the like button would be
        let header = ["Image", "Filename", "Likes", "Id"].map(String::from);
        let mut widths = header.clone().map(|h| h.chars().count());
        for row in &rows {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.chars().count());
            }
        }

        for row in std::iter::once(&header).chain(&rows) {
            let [url, filename, likes, id] = row;
            writeln!(
                fmt,
                "{url:<w0$}  {filename:<w1$}  {likes:>w2$}  {id}",
                w0 = widths[0],
                w1 = widths[1],
                w2 = widths[2],
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for View<'_> {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.app.session() {
            Session::LoggedIn(_) => self.fmt_gallery(fmt),
            Session::LoggedOut => self.fmt_logged_out(fmt),
        }
    }
}
