use crate::error::Error;

//NOTE: This should be parsed by clap automatically, but Option<String> parsing is not supported out of the box as of now
pub fn strip_prefix(prefix: Option<String>) -> Option<String> {
    if let Some(prefix) = prefix {
        match prefix.as_ref() {
            "" => None,
            "\\0" => None,
            v => Some(v.to_string()),
        }
    } else {
        None
    }
}

// Coords are in the format [contig] or [contig]:[start]-[stop]
pub fn parse_coords(coords: &str) -> Result<(&str, Option<u64>, Option<u64>), Error> {
    let mut coord_split = coords.split(':');

    let contig = coord_split
        .next()
        .filter(|c| !c.is_empty())
        .ok_or_else(|| Error::CoordParse {
            coord: coords.into(),
        })?;

    let Some(positions) = coord_split.next() else {
        return Ok((contig, None, None));
    };

    let mut pos_split = positions.split('-');
    let (start, stop) = (pos_split.next(), pos_split.next());

    match (start, stop, pos_split.next()) {
        (Some(start), Some(stop), None) => {
            let parse = |value: &str| {
                value.parse::<u64>().map_err(|_| Error::PosParse {
                    coord: coords.into(),
                    value: value.into(),
                })
            };
            Ok((contig, Some(parse(start)?), Some(parse(stop)?)))
        }
        _ => Err(Error::CoordParse {
            coord: coords.into(),
        }),
    }
}

/// Indexes of `samples` present in `wanted`, all indexes if nothing is wanted
pub fn filter_samples(samples: &[String], wanted: Option<Vec<String>>) -> Vec<usize> {
    match wanted {
        Some(wanted) => samples
            .iter()
            .enumerate()
            .filter(|(_, s)| wanted.contains(s))
            .map(|(i, _)| i)
            .collect(),
        None => (0..samples.len()).collect(),
    }
}

/// Unset relatedness cells are written out as NA
pub fn format_value(value: f64) -> String {
    match value.is_nan() {
        true => String::from("NA"),
        false => value.to_string(),
    }
}
