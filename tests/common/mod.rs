// Shared fixtures for doctrans integration tests
#![allow(dead_code)]

use doctrans::{DefaultValue, IntermediateRepr, ParamVal};

pub const DOC: &str = "Acquire from the official tensorflow_datasets model zoo, \
or the ophthalmology focussed ml-prepare library";

pub const RETURNS_TYPE: &str =
    "Union[Tuple[tf.data.Dataset, tf.data.Dataset], Tuple[np.ndarray, np.ndarray]]";

pub const RETURNS_DEFAULT: &str = "(np.empty(0), np.empty(0))";

/// The signature every representation in the test suite describes
pub fn canonical_ir() -> IntermediateRepr {
    IntermediateRepr::new()
        .with_doc(DOC)
        .with_param(
            "dataset_name",
            ParamVal::new()
                .with_typ("str")
                .with_doc("name of dataset")
                .with_default(DefaultValue::Str("mnist".into())),
        )
        .with_param(
            "tfds_dir",
            ParamVal::new()
                .with_typ("Optional[str]")
                .with_doc("directory to look for models in")
                .with_default(DefaultValue::Str("~/tensorflow_datasets".into())),
        )
        .with_param(
            "K",
            ParamVal::new()
                .with_typ("Literal['np', 'tf']")
                .with_doc("backend engine, e.g., `np` or `tf`")
                .with_default(DefaultValue::Str("np".into())),
        )
        .with_param(
            "as_numpy",
            ParamVal::new()
                .with_typ("Optional[bool]")
                .with_doc("Convert to numpy ndarrays"),
        )
        .with_param(
            "data_loader_kwargs",
            ParamVal::new()
                .with_typ("Optional[dict]")
                .with_doc("pass this as arguments to data_loader function"),
        )
        .with_returns(
            ParamVal::new()
                .with_typ(RETURNS_TYPE)
                .with_doc("Train and tests dataset splits")
                .with_default(DefaultValue::Code(RETURNS_DEFAULT.into())),
        )
}

/// [`canonical_ir`] renamed
pub fn canonical_named(name: &str) -> IntermediateRepr {
    IntermediateRepr {
        name: Some(name.to_string()),
        ..canonical_ir()
    }
}

pub const DOCSTRING_REST: &str = r#"Acquire from the official tensorflow_datasets model zoo, or the ophthalmology focussed ml-prepare library

:param dataset_name: name of dataset, defaults to mnist
:type dataset_name: ```str```

:param tfds_dir: directory to look for models in, defaults to ~/tensorflow_datasets
:type tfds_dir: ```Optional[str]```

:param K: backend engine, e.g., `np` or `tf`, defaults to np
:type K: ```Literal['np', 'tf']```

:param as_numpy: Convert to numpy ndarrays
:type as_numpy: ```Optional[bool]```

:param data_loader_kwargs: pass this as arguments to data_loader function
:type data_loader_kwargs: ```Optional[dict]```

:return: Train and tests dataset splits, defaults to ```(np.empty(0), np.empty(0))```
:rtype: ```Union[Tuple[tf.data.Dataset, tf.data.Dataset], Tuple[np.ndarray, np.ndarray]]```"#;

pub const DOCSTRING_GOOGLE: &str = r#"Acquire from the official tensorflow_datasets model zoo, or the ophthalmology focussed ml-prepare library

Args:
    dataset_name (str): name of dataset, defaults to mnist
    tfds_dir (str, optional): directory to look for models in, defaults to ~/tensorflow_datasets
    K (Literal['np', 'tf']): backend engine, e.g., `np` or `tf`, defaults to np
    as_numpy (Optional[bool]): Convert to numpy ndarrays
    data_loader_kwargs (dict, optional): pass this as arguments to data_loader function

Returns:
    Union[Tuple[tf.data.Dataset, tf.data.Dataset], Tuple[np.ndarray, np.ndarray]]: Train and tests dataset splits, defaults to ```(np.empty(0), np.empty(0))```
"#;

pub const DOCSTRING_NUMPY: &str = r#"Acquire from the official tensorflow_datasets model zoo, or the ophthalmology focussed ml-prepare library

Parameters
----------
dataset_name : str
    name of dataset, defaults to mnist
tfds_dir : str, optional
    directory to look for models in, defaults to ~/tensorflow_datasets
K : Literal['np', 'tf']
    backend engine, e.g., `np` or `tf`, defaults to np
as_numpy : Optional[bool]
    Convert to numpy ndarrays
data_loader_kwargs : dict, optional
    pass this as arguments to data_loader function

Returns
-------
Union[Tuple[tf.data.Dataset, tf.data.Dataset], Tuple[np.ndarray, np.ndarray]]
    Train and tests dataset splits, defaults to ```(np.empty(0), np.empty(0))```
"#;
