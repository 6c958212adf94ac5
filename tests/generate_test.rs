//! Integration tests: spreadsheet in, DOCX out.

use abstractdoc::template::{full_columns as full, legacy_columns as legacy};
use abstractdoc::{
    generate_with_options, AbstractDoc, Error, Record, RenderOptions, TemplateKind,
};
use rust_xlsxwriter::Workbook;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const FULL_HEADERS: &[&str] = &[
    full::TITLE,
    full::NAME,
    full::AFFILIATION,
    full::EMAIL,
    full::DOI,
    full::ABSTRACT,
    full::FIGURE_FILE,
    full::FIGURE_COMMENT,
    full::REFERENCES,
    full::ACKNOWLEDGEMENT,
    full::FUNDING,
    full::PROGRAM_LONG,
];

/// Write a single-sheet workbook with a header row and data rows.
fn write_workbook(path: &Path, headers: &[&str], rows: &[Vec<&str>]) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Abstracts").unwrap();
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    for (r, row) in rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            if !value.is_empty() {
                sheet.write_string(r as u32 + 1, col as u16, *value).unwrap();
            }
        }
    }
    workbook.save(path).unwrap();
}

/// Write a 400 x 200 px PNG without resolution metadata.
fn write_png(path: &Path) {
    image::RgbImage::from_pixel(400, 200, image::Rgb([200, 30, 30]))
        .save(path)
        .unwrap();
}

fn full_row<'a>(title: &'a str, figure: &'a str, comment: &'a str) -> Vec<&'a str> {
    vec![
        title,
        "Ada Lovelace (1)(2)\nCharles Babbage (2)",
        "(1)Analytical Society\n(2)Royal Institution",
        "ada@example.org",
        "10.12751/incf.ni2016.0001",
        "First paragraph.\nSecond paragraph.",
        figure,
        comment,
        "Menabrea, L. F. (1842).",
        "",
        "Engine Fund",
        "P001",
    ]
}

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("image")).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn image_dir(&self) -> PathBuf {
        self.path("image")
    }

    fn full_options(&self) -> RenderOptions {
        RenderOptions::new()
            .with_template(TemplateKind::Aini2016)
            .with_image_dir(self.image_dir())
    }
}

fn read_part(path: &Path, name: &str) -> String {
    let bytes = std::fs::read(path).unwrap();
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut file = archive.by_name(name).unwrap();
    let mut content = String::new();
    file.read_to_string(&mut content).unwrap();
    content
}

fn part_names(path: &Path) -> Vec<String> {
    let bytes = std::fs::read(path).unwrap();
    let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    archive.file_names().map(str::to_string).collect()
}

#[test]
fn test_full_layout_one_section_per_row() {
    let fx = Fixture::new();
    write_png(&fx.image_dir().join("fig1.png"));
    let input = fx.path("abstracts.xlsx");
    write_workbook(
        &input,
        FULL_HEADERS,
        &[
            full_row("Alpha study", "fig1.png", "Red square."),
            full_row("Beta study", "", "Caption without figure."),
            full_row("Gamma study", "", ""),
        ],
    );
    let output = fx.path("abstracts.docx");

    let result = generate_with_options(&input, &output, fx.full_options()).unwrap();
    assert_eq!(result.stats.section_count, 3);
    assert_eq!(result.stats.image_count, 1);
    assert_eq!(result.metadata.record_count, 3);
    assert_eq!(
        std::fs::metadata(&output).unwrap().len() as usize,
        result.bytes_written
    );

    let document = read_part(&output, "word/document.xml");
    assert_eq!(document.matches("<w:sectPr>").count(), 3);
    assert_eq!(document.matches("<w:type w:val=\"nextPage\"/>").count(), 2);

    let alpha = document.find("Alpha study").unwrap();
    let beta = document.find("Beta study").unwrap();
    let gamma = document.find("Gamma study").unwrap();
    assert!(alpha < beta && beta < gamma);

    // Only the first record has a figure, so only it gets a caption.
    assert_eq!(document.matches(">Figure: </w:t>").count(), 1);
    assert!(!document.contains("Caption without figure."));
    assert!(document.contains("<wp:extent cx=\"5040000\""));

    assert!(part_names(&output).contains(&"word/media/image1.png".to_string()));
    let rels = read_part(&output, "word/_rels/document.xml.rels");
    assert!(rels.contains("Target=\"media/image1.png\""));
}

#[test]
fn test_full_layout_page_geometry() {
    let fx = Fixture::new();
    let input = fx.path("abstracts.xlsx");
    write_workbook(&input, FULL_HEADERS, &[full_row("Only", "", "")]);
    let output = fx.path("out.docx");

    generate_with_options(&input, &output, fx.full_options()).unwrap();

    let document = read_part(&output, "word/document.xml");
    assert!(document.contains("<w:pgSz w:w=\"11906\" w:h=\"16838\""));
    assert!(document.contains("w:top=\"1134\""));
    assert!(document.contains("w:bottom=\"850\""));
    assert!(document.contains("DOI:10.12751/incf.ni2016.0001"));
    assert!(document.contains("Citation: "));
}

#[test]
fn test_missing_figure_leaves_no_output() {
    let fx = Fixture::new();
    let input = fx.path("abstracts.xlsx");
    write_workbook(
        &input,
        FULL_HEADERS,
        &[
            full_row("Alpha", "", ""),
            full_row("Beta", "does-not-exist.png", "Caption"),
        ],
    );
    let output = fx.path("out.docx");

    let err = generate_with_options(&input, &output, fx.full_options()).unwrap_err();
    match err {
        Error::Figure { path, .. } => assert!(path.ends_with("does-not-exist.png")),
        other => panic!("expected figure error, got {:?}", other),
    }
    assert!(!output.exists());
}

#[test]
fn test_malformed_author_reports_row() {
    let fx = Fixture::new();
    let input = fx.path("abstracts.xlsx");
    let mut bad = full_row("Broken", "", "");
    bad[1] = "Jane) Doe";
    write_workbook(&input, FULL_HEADERS, &[full_row("Fine", "", ""), bad]);
    let output = fx.path("out.docx");

    let err = generate_with_options(&input, &output, fx.full_options()).unwrap_err();
    assert!(matches!(err, Error::AuthorParse { row: 2, .. }));
    assert!(err.is_content_error());
    assert!(!output.exists());
}

#[test]
fn test_missing_required_column() {
    let fx = Fixture::new();
    let input = fx.path("abstracts.xlsx");
    let headers: Vec<&str> = FULL_HEADERS
        .iter()
        .copied()
        .filter(|h| *h != full::DOI)
        .collect();
    let mut row = full_row("No DOI", "", "");
    row.remove(4);
    write_workbook(&input, &headers, &[row]);

    let err = generate_with_options(&input, fx.path("out.docx"), fx.full_options()).unwrap_err();
    assert!(matches!(err, Error::MissingColumn { row: 1, ref column } if column == "DOI"));
}

#[test]
fn test_legacy_layout() {
    let fx = Fixture::new();
    let input = fx.path("abstracts.xlsx");
    write_workbook(
        &input,
        legacy::ALL,
        &[
            vec![
                "H<sub>2</sub>O transport",
                "A. Author(1), B. Author(2)",
                "1 Water Lab, 2 Ice Lab",
                "Body text.",
                "water, ice",
            ],
            vec!["Second", "C. Author(1)", "1 Lab", "More body.", "k"],
        ],
    );
    let output = fx.path("legacy.docx");

    let options = RenderOptions::new().with_template(TemplateKind::Jscpb2016);
    let result = generate_with_options(&input, &output, options).unwrap();
    assert_eq!(result.stats.section_count, 2);
    assert_eq!(result.stats.image_count, 0);

    let document = read_part(&output, "word/document.xml");
    assert_eq!(document.matches("<w:sectPr>").count(), 2);
    assert!(document.contains("<w:vertAlign w:val=\"subscript\"/>"));
    assert!(document.contains("Keywords: "));
    assert!(!document.contains("&lt;sub&gt;"));
}

#[test]
fn test_builder_with_sheet_and_base_template() {
    let fx = Fixture::new();
    let input = fx.path("abstracts.xlsx");
    write_workbook(&input, FULL_HEADERS, &[full_row("Alpha", "", "")]);

    // A base template produced by a first run supplies the styles of the second.
    let base = fx.path("base.docx");
    generate_with_options(&input, &base, fx.full_options()).unwrap();

    let output = fx.path("styled.docx");
    let result = AbstractDoc::new()
        .with_image_dir(fx.image_dir())
        .with_base_template(&base)
        .with_sheet_name("Abstracts")
        .load(&input)
        .unwrap()
        .save(&output)
        .unwrap();
    assert_eq!(result.stats.section_count, 1);
    assert_eq!(
        read_part(&output, "word/styles.xml"),
        read_part(&base, "word/styles.xml")
    );
}

#[test]
fn test_unknown_sheet() {
    let fx = Fixture::new();
    let input = fx.path("abstracts.xlsx");
    write_workbook(&input, FULL_HEADERS, &[full_row("Alpha", "", "")]);

    let result = AbstractDoc::new().with_sheet_name("Posters").load(&input);
    assert!(matches!(result, Err(Error::SheetNotFound(ref name)) if name == "Posters"));
}

#[test]
fn test_zero_dpi_is_rejected_before_writing() {
    let fx = Fixture::new();
    write_png(&fx.image_dir().join("fig1.png"));
    let input = fx.path("abstracts.xlsx");
    write_workbook(&input, FULL_HEADERS, &[full_row("Alpha", "fig1.png", "Caption")]);
    let output = fx.path("out.docx");

    let options = fx.full_options().with_default_dpi(0.0);
    let err = generate_with_options(&input, &output, options).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert!(!output.exists());
}

#[test]
fn test_control_characters_do_not_reach_the_package() {
    let record = Record::new(
        1,
        [
            (legacy::TITLE, "A\u{B}B"),
            (legacy::AUTHORS, "C. Author(1)"),
            (legacy::AFFILIATIONS, "1 Lab"),
            (legacy::ABSTRACT, "Body\u{1}text."),
            (legacy::KEYWORDS, "k"),
        ],
    );
    let bytes = AbstractDoc::new()
        .with_template(TemplateKind::Jscpb2016)
        .render(&[record])
        .unwrap()
        .to_docx_bytes()
        .unwrap();

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut document = String::new();
    archive
        .by_name("word/document.xml")
        .unwrap()
        .read_to_string(&mut document)
        .unwrap();
    assert!(!document.contains('\u{B}'));
    assert!(!document.contains('\u{1}'));
    assert!(document.contains(">AB</w:t>"));
    assert!(document.contains(">Bodytext.</w:t>"));
}
