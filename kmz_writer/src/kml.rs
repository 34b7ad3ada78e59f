//! KML 2.2 document assembly. The document carries a single shared style
//! referenced by every placemark, which keeps large parcel sets compact.

use std::fmt::Write;

use cadastral::ParcelFeature;
use geo::{LineString, Polygon};
use itertools::Itertools;

const STYLE_ID: &str = "parcel";
/// #A23F97 in KML aabbggrr order: 40% alpha for the fill, opaque outline.
const FILL_COLOR: &str = "66973fa2";
const LINE_COLOR: &str = "ff973fa2";
const LINE_WIDTH: u32 = 3;

pub(crate) fn document(
    folder_name: &str,
    parcels: &[ParcelFeature],
) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(out, r#"<kml xmlns="http://www.opengis.net/kml/2.2">"#)?;
    writeln!(out, "<Document>")?;
    writeln!(out, "<name>{}</name>", escape_xml(folder_name))?;
    write_shared_style(&mut out)?;
    writeln!(out, "<Folder>")?;
    writeln!(out, "<name>{}</name>", escape_xml(folder_name))?;
    for parcel in parcels {
        write_placemark(&mut out, parcel)?;
    }
    writeln!(out, "</Folder>")?;
    writeln!(out, "</Document>")?;
    writeln!(out, "</kml>")?;
    Ok(out)
}

fn write_shared_style(out: &mut String) -> std::fmt::Result {
    writeln!(out, r#"<Style id="{STYLE_ID}">"#)?;
    writeln!(
        out,
        "<LineStyle><color>{LINE_COLOR}</color><width>{LINE_WIDTH}</width></LineStyle>"
    )?;
    writeln!(
        out,
        "<PolyStyle><color>{FILL_COLOR}</color><fill>1</fill></PolyStyle>"
    )?;
    writeln!(out, "</Style>")
}

fn write_placemark(out: &mut String, parcel: &ParcelFeature) -> std::fmt::Result {
    writeln!(out, "<Placemark>")?;
    writeln!(out, "<name>{}</name>", escape_xml(&parcel.lotplan.canonical()))?;
    let description = parcel.attributes.description_lines().join("\n");
    if !description.is_empty() {
        writeln!(out, "<description>{}</description>", escape_xml(&description))?;
    }
    writeln!(out, "<styleUrl>#{STYLE_ID}</styleUrl>")?;

    let polygons = &parcel.geometry.0;
    if polygons.len() == 1 {
        write_polygon(out, &polygons[0])?;
    } else {
        writeln!(out, "<MultiGeometry>")?;
        for polygon in polygons {
            write_polygon(out, polygon)?;
        }
        writeln!(out, "</MultiGeometry>")?;
    }
    writeln!(out, "</Placemark>")
}

fn write_polygon(out: &mut String, polygon: &Polygon<f64>) -> std::fmt::Result {
    writeln!(out, "<Polygon>")?;
    writeln!(out, "<outerBoundaryIs>")?;
    write_ring(out, polygon.exterior())?;
    writeln!(out, "</outerBoundaryIs>")?;
    for hole in polygon.interiors() {
        writeln!(out, "<innerBoundaryIs>")?;
        write_ring(out, hole)?;
        writeln!(out, "</innerBoundaryIs>")?;
    }
    writeln!(out, "</Polygon>")
}

fn write_ring(out: &mut String, ring: &LineString<f64>) -> std::fmt::Result {
    let coordinates = ring
        .coords()
        .map(|coord| format!("{},{},0", coord.x, coord.y))
        .join(" ");
    writeln!(
        out,
        "<LinearRing><coordinates>{coordinates}</coordinates></LinearRing>"
    )
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}
