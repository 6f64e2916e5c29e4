use std::path::Path;

fn main() {
    let matrices_path = Path::new("matrices/substitution_matrices.json");
    validate_matrices_file(matrices_path);
    set_build_dependencies();
}

fn validate_matrices_file(matrices_path: &Path) {
    // Ensure the embedded matrices exist at build time
    assert!(
        matrices_path.exists(),
        "\n\nMATRIX BUILD ERROR: File not found\n\
         Path: {}\n\
         Please create the substitution matrix file before building.\n",
        matrices_path.display()
    );

    let contents = std::fs::read_to_string(matrices_path).unwrap_or_else(|e| {
        panic!(
            "\n\nMATRIX BUILD ERROR: Failed to read file\n\
             Path: {}\n\
             Error: {e}\n",
            matrices_path.display()
        );
    });

    let document: serde_json::Value = serde_json::from_str(&contents).unwrap_or_else(|e| {
        panic!(
            "\n\nMATRIX BUILD ERROR: Invalid JSON\n\
             Path: {}\n\
             Error: {e}\n\
             Hint: Check for missing commas, brackets, or invalid syntax.\n",
            matrices_path.display()
        );
    });

    validate_document_structure(&document);
}

fn validate_document_structure(document: &serde_json::Value) {
    assert!(
        document.is_object(),
        "\n\nMATRIX BUILD ERROR: Root must be a JSON object\n\
         Got: {document}\n"
    );

    let matrices = document
        .get("matrices")
        .and_then(serde_json::Value::as_array)
        .unwrap_or_else(|| {
            panic!(
                "\n\nMATRIX BUILD ERROR: Missing 'matrices' array\n\
                 The file must have a top-level 'matrices' array.\n"
            );
        });

    for (i, matrix) in matrices.iter().enumerate() {
        validate_matrix(matrix, i);
    }

    println!(
        "cargo:warning=Validated {} embedded substitution matrices",
        matrices.len()
    );
}

fn validate_matrix(matrix: &serde_json::Value, index: usize) {
    let name = matrix
        .get("name")
        .and_then(|v| v.as_str())
        .unwrap_or_else(|| {
            panic!("\n\nMATRIX BUILD ERROR: Matrix at index {index} missing 'name' field\n")
        });

    let alphabet = matrix
        .get("alphabet")
        .and_then(|v| v.as_str())
        .unwrap_or_else(|| {
            panic!("\n\nMATRIX BUILD ERROR: Matrix '{name}' missing 'alphabet' field\n")
        });

    let rows = matrix
        .get("scores")
        .and_then(|v| v.as_array())
        .unwrap_or_else(|| {
            panic!("\n\nMATRIX BUILD ERROR: Matrix '{name}' missing 'scores' array\n")
        });

    let dim = alphabet.chars().count();
    assert!(
        rows.len() == dim,
        "\n\nMATRIX BUILD ERROR: Matrix '{name}' has {} rows for an alphabet of {dim} symbols\n",
        rows.len()
    );

    let table: Vec<Vec<i64>> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let values = row.as_array().unwrap_or_else(|| {
                panic!("\n\nMATRIX BUILD ERROR: Matrix '{name}' row {i} is not an array\n")
            });
            assert!(
                values.len() == dim,
                "\n\nMATRIX BUILD ERROR: Matrix '{name}' row {i} has {} columns, expected {dim}\n",
                values.len()
            );
            values
                .iter()
                .map(|v| {
                    v.as_i64().unwrap_or_else(|| {
                        panic!(
                            "\n\nMATRIX BUILD ERROR: Matrix '{name}' row {i} has a non-integer value: {v}\n"
                        )
                    })
                })
                .collect()
        })
        .collect();

    for i in 0..dim {
        for j in (i + 1)..dim {
            assert!(
                table[i][j] == table[j][i],
                "\n\nMATRIX BUILD ERROR: Matrix '{name}' is not symmetric at ({i}, {j})\n"
            );
        }
    }
}

fn set_build_dependencies() {
    // Tell cargo to rerun if the matrices change
    println!("cargo:rerun-if-changed=matrices/substitution_matrices.json");

    // Tell cargo to rerun if build.rs changes
    println!("cargo:rerun-if-changed=build.rs");
}
