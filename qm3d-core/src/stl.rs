/// STL reading (binary and ASCII) and ASCII writing for triangle groups
use nom::{
    bytes::complete::{tag, take},
    character::complete::{multispace0, multispace1, not_line_ending},
    multi::{count, many0},
    number::complete::{double, le_f32, le_u32},
    sequence::{preceded, tuple},
    IResult,
};

use crate::error::{MathError, Result};
use crate::math_util::format_scientific;
use crate::triangle_group::TriangleGroup;
use crate::vector::Vector;

const BINARY_HEADER_LEN: usize = 80;
const BINARY_FACET_LEN: usize = 50;

/// Write a group as an ASCII STL solid, one facet block per triangle
pub fn write_ascii_stl(group: &TriangleGroup, name: &str) -> Result<String> {
    let mut out = format!("solid {}\n", name);
    for index in 0..group.n_faces() {
        let normal = group.facet_normal(index)?;
        out.push_str(&format!(
            "facet normal {} {} {}\n",
            format_scientific(normal[0]),
            format_scientific(normal[1]),
            format_scientific(normal[2])
        ));
        out.push_str("outer loop\n");
        for corner in group.triangle_corners(index)? {
            out.push_str(&corner.to_stl_vertex());
            out.push('\n');
        }
        out.push_str("endloop\nendfacet\n");
    }
    out.push_str(&format!("endsolid {}", name));
    Ok(out)
}

/// Parse a binary STL file
pub fn parse_binary_stl(data: &[u8]) -> Result<TriangleGroup> {
    if data.len() < BINARY_HEADER_LEN + 4 {
        return Err(MathError::Stl("file too small to be a valid STL".to_string()));
    }

    let (_, facets) = parse_binary_stl_impl(data)
        .map_err(|_| MathError::Stl("unexpected end of file".to_string()))?;
    build_group(facets)
}

fn parse_binary_stl_impl(input: &[u8]) -> IResult<&[u8], Vec<[[f64; 3]; 3]>> {
    let (input, _) = take(BINARY_HEADER_LEN)(input)?;
    let (input, triangle_count) = le_u32(input)?;
    // Each facet is 50 bytes, so a corrupt count cannot force a huge allocation.
    let available = input.len() / BINARY_FACET_LEN;
    if (triangle_count as usize) > available {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Eof,
        )));
    }
    count(parse_binary_facet, triangle_count as usize)(input)
}

fn parse_binary_facet(input: &[u8]) -> IResult<&[u8], [[f64; 3]; 3]> {
    // The stored normal is recomputed from the winding.
    let (input, _normal) = parse_binary_vector3(input)?;
    let (input, a) = parse_binary_vector3(input)?;
    let (input, b) = parse_binary_vector3(input)?;
    let (input, c) = parse_binary_vector3(input)?;
    // Attribute byte count
    let (input, _) = take(2usize)(input)?;
    Ok((input, [a, b, c]))
}

fn parse_binary_vector3(input: &[u8]) -> IResult<&[u8], [f64; 3]> {
    let (input, (x, y, z)) = tuple((le_f32, le_f32, le_f32))(input)?;
    Ok((input, [x as f64, y as f64, z as f64]))
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> Result<TriangleGroup> {
    match parse_ascii_stl_impl(input) {
        Ok((_, (name, facets))) => {
            log::debug!("parsed ASCII solid '{}' with {} facets", name, facets.len());
            build_group(facets)
        }
        Err(e) => Err(MathError::Stl(format!("failed to parse ASCII STL: {:?}", e))),
    }
}

fn parse_ascii_stl_impl(input: &str) -> IResult<&str, (&str, Vec<[[f64; 3]; 3]>)> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, name) = not_line_ending(input)?;
    let (input, facets) = many0(parse_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;
    let (input, _) = not_line_ending(input)?;
    Ok((input, (name.trim(), facets)))
}

fn parse_facet(input: &str) -> IResult<&str, [[f64; 3]; 3]> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, _normal) = parse_vector3(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, v1) = parse_vertex(input)?;
    let (input, v2) = parse_vertex(input)?;
    let (input, v3) = parse_vertex(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;

    Ok((input, [v1, v2, v3]))
}

fn parse_vertex(input: &str) -> IResult<&str, [f64; 3]> {
    let (input, _) = preceded(multispace0, tag("vertex"))(input)?;
    parse_vector3(input)
}

fn parse_vector3(input: &str) -> IResult<&str, [f64; 3]> {
    let (input, _) = multispace0(input)?;
    let (input, x) = double(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = double(input)?;
    let (input, _) = multispace1(input)?;
    let (input, z) = double(input)?;
    Ok((input, [x, y, z]))
}

/// Detect and parse STL file (binary or ASCII)
pub fn parse_stl(data: &[u8]) -> Result<TriangleGroup> {
    // Binary files may also start with "solid", so fall back on failure.
    if data.len() > 5 && &data[0..5] == b"solid" {
        if let Ok(text) = std::str::from_utf8(data) {
            if let Ok(group) = parse_ascii_stl(text) {
                return Ok(group);
            }
        }
    }

    parse_binary_stl(data)
}

fn build_group(facets: Vec<[[f64; 3]; 3]>) -> Result<TriangleGroup> {
    let mut group = TriangleGroup::new();
    let mut skipped = 0usize;
    for [a, b, c] in facets {
        match group.add_triangle(&Vector::from(a), &Vector::from(b), &Vector::from(c)) {
            Ok(_) => {}
            Err(MathError::InvalidArgument(_)) => skipped += 1,
            Err(e) => return Err(e),
        }
    }
    if skipped > 0 {
        log::warn!("skipped {} degenerate facets", skipped);
    }
    Ok(group)
}
