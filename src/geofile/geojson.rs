use std::{fs, io, path::Path};

pub fn write_feature_collection(
    collection: &geojson::FeatureCollection,
    output_filepath: &Path,
) -> io::Result<()> {
    let geojson_contents = geojson::GeoJson::from(collection.clone());
    fs::write(output_filepath, geojson_contents.to_string())
}
