use super::ElfFile;
use crate::test_image::ImageBuilder;

#[test]
fn finds_sections_by_name() {
    let image = ImageBuilder::new()
        .section(".debug_info", vec![1, 2, 3, 4])
        .section_at(".text", vec![0x90; 16], 0x400000)
        .build();

    let elf = ElfFile::from_bytes(image).unwrap();

    let info = elf.section(".debug_info").unwrap();
    assert_eq!(info.data, &[1, 2, 3, 4]);
    assert_eq!(info.size, 4);
    assert!(!info.is_writable());

    let text = elf.section(".text").unwrap();
    assert_eq!(text.load_address, 0x400000);
    assert_eq!(text.data.len(), 16);

    assert!(elf.section(".debug_abbrev").is_none());
}

#[test]
fn writable_flag_is_reported() {
    let image = ImageBuilder::new()
        .writable_section(".eh_frame", vec![0; 8])
        .build();

    let elf = ElfFile::from_bytes(image).unwrap();
    assert!(elf.section(".eh_frame").unwrap().is_writable());
}

#[test]
fn rejects_non_elf_input() {
    assert!(ElfFile::from_bytes(vec![0; 16]).is_err());
    assert!(ElfFile::from_bytes(b"\x7fELF".to_vec()).is_err());
}

#[test]
fn rejects_big_endian_images() {
    let mut image = ImageBuilder::new().section(".text", vec![0]).build();
    image[5] = 2; // ELFDATA2MSB
    assert!(matches!(
        ElfFile::from_bytes(image),
        Err(crate::error::Error::Unsupported(_))
    ));
}
