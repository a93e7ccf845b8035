//! The menu loop and the fixed-format record output.

use chrono::NaiveDate;
use mediacat_core::{Catalog, Photo, PhotoDetails, StoreError};
use std::io::{self, BufRead, Write};

/// Run the menu until the user picks exit or the input ends. Store
/// errors are printed as a single line and the loop keeps going; only
/// console I/O failures abort.
pub fn run_menu<R, W>(catalog: &Catalog, input: &mut R, output: &mut W) -> io::Result<()>
where
    R: BufRead,
    W: Write,
{
    loop {
        writeln!(output)?;
        writeln!(output, "=== Main Menu ===")?;
        writeln!(output, "1. Find Photo by ID")?;
        writeln!(output, "2. Update Photo Details")?;
        writeln!(output, "3. Find Album by Name")?;
        writeln!(output, "4. Exit")?;
        let Some(choice) = prompt(input, output, "Enter choice: ")? else {
            return Ok(());
        };

        match choice.as_str() {
            "1" => find_photo(catalog, input, output)?,
            "2" => update_photo(catalog, input, output)?,
            "3" => find_album(catalog, input, output)?,
            "4" => {
                writeln!(output, "Goodbye!")?;
                return Ok(());
            }
            _ => writeln!(output, "Invalid choice, please try again.")?,
        }
    }
}

/// Print `label`, read one line, strip the line ending. `None` means the
/// input ended.
fn prompt<R, W>(input: &mut R, output: &mut W, label: &str) -> io::Result<Option<String>>
where
    R: BufRead,
    W: Write,
{
    write!(output, "{label}")?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

fn find_photo<R, W>(catalog: &Catalog, input: &mut R, output: &mut W) -> io::Result<()>
where
    R: BufRead,
    W: Write,
{
    let Some(raw_id) = prompt(input, output, "Photo ID? ")? else {
        return Ok(());
    };
    match lookup_photo(catalog, &raw_id) {
        Ok(Some(photo)) => print_photo(output, &photo)?,
        Ok(None) => writeln!(output, "Photo does not exist.")?,
        Err(e) => writeln!(output, "Error: {e}")?,
    }
    Ok(())
}

fn update_photo<R, W>(catalog: &Catalog, input: &mut R, output: &mut W) -> io::Result<()>
where
    R: BufRead,
    W: Write,
{
    let Some(raw_id) = prompt(input, output, "Enter photo ID to update: ")? else {
        return Ok(());
    };
    let Some(new_title) = prompt(input, output, "Enter new title: ")? else {
        return Ok(());
    };

    let details = PhotoDetails {
        title: Some(new_title),
        ..PhotoDetails::default()
    };
    let updated = match raw_id.trim().parse::<i64>() {
        Ok(id) => catalog.update_photo_details(id, &details),
        Err(_) => Ok(None),
    };
    match updated {
        Ok(Some(photo)) => {
            writeln!(output, "Photo updated successfully.")?;
            print_photo(output, &photo)?;
        }
        Ok(None) => writeln!(output, "Photo not found or could not be updated.")?,
        Err(e) => writeln!(output, "Error: {e}")?,
    }
    Ok(())
}

fn find_album<R, W>(catalog: &Catalog, input: &mut R, output: &mut W) -> io::Result<()>
where
    R: BufRead,
    W: Write,
{
    let Some(name) = prompt(input, output, "What is the name of the album? ")? else {
        return Ok(());
    };
    match catalog.find_album_by_name(&name) {
        Ok(Some(album)) => {
            let photos = album.photos.unwrap_or_default();
            if photos.is_empty() {
                writeln!(output, "Album not found or has no photos.")?;
                return Ok(());
            }
            writeln!(output, "filename,resolution,tags")?;
            for photo in &photos {
                writeln!(
                    output,
                    "{},{},{}",
                    photo.filename,
                    photo.resolution,
                    photo.tags.join(":")
                )?;
            }
        }
        Ok(None) => writeln!(output, "Album not found or has no photos.")?,
        Err(e) => writeln!(output, "Error: {e}")?,
    }
    Ok(())
}

fn lookup_photo(catalog: &Catalog, raw_id: &str) -> Result<Option<Photo>, StoreError> {
    match raw_id.trim().parse::<i64>() {
        Ok(id) => catalog.find_photo_by_id(id),
        Err(_) => Ok(None),
    }
}

// The record block keeps its ragged label alignment.
fn print_photo<W: Write>(output: &mut W, photo: &Photo) -> io::Result<()> {
    writeln!(output, "Photo ID? {}", photo.id)?;
    writeln!(output, "Filename: {}", photo.filename)?;
    writeln!(output, " Title: {}", photo.title)?;
    writeln!(output, "  Date: {}", format_date(&photo.date))?;
    writeln!(output, "Albums: {}", join_ids(&photo.albums))?;
    writeln!(output, "  Tags: {}", photo.tags.join(", "))?;
    Ok(())
}

/// `2020-07-15` comes out as `July 15, 2020`; anything unparsable is
/// printed as stored.
fn format_date(raw: &str) -> String {
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date.format("%B %-d, %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

fn join_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediacat_core::{Settings, Store};
    use std::fs;
    use std::io::Cursor;
    use std::path::Path;

    const PHOTOS_SEED: &str = r#"[
        {
            "id": 1,
            "filename": "sunset.jpg",
            "title": "Sunset",
            "description": "Sunset over the bay",
            "date": "2020-07-15",
            "resolution": "1920x1080",
            "albums": [1, 2],
            "tags": ["sunset", "sky"]
        },
        {
            "id": 2,
            "filename": "harbor.jpg",
            "title": "Harbor",
            "description": "Boats in the harbor",
            "date": "2021-06-05",
            "resolution": "3840x2160",
            "albums": [2],
            "tags": ["boats"]
        },
        {
            "id": 3,
            "filename": "dunes.jpg",
            "title": "Dunes",
            "description": "Dunes at noon",
            "date": "2019-02-28",
            "resolution": "1920x1080",
            "albums": [1],
            "tags": []
        }
    ]"#;

    const ALBUMS_SEED: &str = r#"[
        { "id": 1, "name": "Summer" },
        { "id": 2, "name": "Travel" },
        { "id": 3, "name": "Empty" }
    ]"#;

    fn test_catalog(dir: &Path) -> Catalog {
        let data_dir = dir.join("data");
        fs::create_dir_all(&data_dir).unwrap();
        fs::write(data_dir.join("photos.json"), PHOTOS_SEED).unwrap();
        fs::write(data_dir.join("albums.json"), ALBUMS_SEED).unwrap();
        let settings = Settings {
            db_path: dir.join("catalog.db").to_string_lossy().into_owned(),
            data_dir: data_dir.to_string_lossy().into_owned(),
            ..Settings::default()
        };
        let store = Store::new(&settings);
        store.connect().unwrap();
        Catalog::new(store)
    }

    fn run_script(catalog: &Catalog, script: &str) -> String {
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut output = Vec::new();
        run_menu(catalog, &mut input, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_find_photo_prints_record_block() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = test_catalog(dir.path());

        let out = run_script(&catalog, "1\n1\n4\n");
        let expected = concat!(
            "Photo ID? 1\n",
            "Filename: sunset.jpg\n",
            " Title: Sunset\n",
            "  Date: July 15, 2020\n",
            "Albums: 1, 2\n",
            "  Tags: sunset, sky\n",
        );
        assert!(out.contains(expected));
        assert!(out.ends_with("Goodbye!\n"));
    }

    #[test]
    fn test_find_photo_reports_missing_and_unparsable_ids() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = test_catalog(dir.path());

        let out = run_script(&catalog, "1\n999\n4\n");
        assert!(out.contains("Photo does not exist.\n"));

        let out = run_script(&catalog, "1\nnot-a-number\n4\n");
        assert!(out.contains("Photo does not exist.\n"));
    }

    #[test]
    fn test_update_photo_prints_updated_record() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = test_catalog(dir.path());

        let out = run_script(&catalog, "2\n1\nGolden Hour\n4\n");
        assert!(out.contains("Photo updated successfully.\n"));
        assert!(out.contains(" Title: Golden Hour\n"));

        let photo = catalog.find_photo_by_id(1).unwrap().unwrap();
        assert_eq!(photo.title, "Golden Hour");
        assert_eq!(photo.description, "Sunset over the bay");
    }

    #[test]
    fn test_update_unknown_photo_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = test_catalog(dir.path());

        let out = run_script(&catalog, "2\n999\nNew Title\n4\n");
        assert!(out.contains("Photo not found or could not be updated.\n"));
    }

    #[test]
    fn test_find_album_prints_csv_lines() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = test_catalog(dir.path());

        let out = run_script(&catalog, "3\nsummer\n4\n");
        let expected = concat!(
            "filename,resolution,tags\n",
            "sunset.jpg,1920x1080,sunset:sky\n",
            "dunes.jpg,1920x1080,\n",
        );
        assert!(out.contains(expected));
    }

    #[test]
    fn test_find_album_without_photos_reports_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = test_catalog(dir.path());

        let out = run_script(&catalog, "3\nEmpty\n4\n");
        assert!(out.contains("Album not found or has no photos.\n"));

        let out = run_script(&catalog, "3\nNo Such Album\n4\n");
        assert!(out.contains("Album not found or has no photos.\n"));
    }

    #[test]
    fn test_invalid_choice_reprints_menu() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = test_catalog(dir.path());

        let out = run_script(&catalog, "9\n4\n");
        assert!(out.contains("Invalid choice, please try again.\n"));
        assert_eq!(out.matches("=== Main Menu ===").count(), 2);
        assert!(out.ends_with("Goodbye!\n"));
    }

    #[test]
    fn test_end_of_input_ends_loop_quietly() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = test_catalog(dir.path());

        let out = run_script(&catalog, "");
        assert_eq!(out.matches("=== Main Menu ===").count(), 1);
        assert!(!out.contains("Goodbye!"));
    }

    #[test]
    fn test_format_date_handles_iso_and_raw_values() {
        assert_eq!(format_date("2020-07-15"), "July 15, 2020");
        assert_eq!(format_date("2019-02-28"), "February 28, 2019");
        assert_eq!(format_date("sometime"), "sometime");
        assert_eq!(format_date(""), "");
    }
}
