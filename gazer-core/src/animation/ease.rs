//! Ease in/out curve for eye movements, `3t^2 - 2t^3` over 0..=255

#[rustfmt::skip]
pub const EASE: [u8; 256] = [
      0,   0,   0,   0,   0,   0,   0,   1,   1,   1,   1,   1,   2,   2,   2,   3,
      3,   3,   4,   4,   4,   5,   5,   6,   6,   7,   7,   8,   9,   9,  10,  10,
     11,  12,  12,  13,  14,  15,  15,  16,  17,  18,  18,  19,  20,  21,  22,  23,
     24,  25,  26,  27,  27,  28,  29,  30,  31,  33,  34,  35,  36,  37,  38,  39,
     40,  41,  42,  44,  45,  46,  47,  48,  50,  51,  52,  53,  54,  56,  57,  58,
     60,  61,  62,  63,  65,  66,  67,  69,  70,  72,  73,  74,  76,  77,  78,  80,
     81,  83,  84,  85,  87,  88,  90,  91,  93,  94,  96,  97,  98, 100, 101, 103,
    104, 106, 107, 109, 110, 112, 113, 115, 116, 118, 119, 121, 122, 124, 125, 127,
    128, 130, 131, 133, 134, 136, 137, 139, 140, 142, 143, 145, 146, 148, 149, 151,
    152, 154, 155, 157, 158, 159, 161, 162, 164, 165, 167, 168, 170, 171, 172, 174,
    175, 177, 178, 179, 181, 182, 183, 185, 186, 188, 189, 190, 192, 193, 194, 195,
    197, 198, 199, 201, 202, 203, 204, 205, 207, 208, 209, 210, 211, 213, 214, 215,
    216, 217, 218, 219, 220, 221, 222, 224, 225, 226, 227, 228, 228, 229, 230, 231,
    232, 233, 234, 235, 236, 237, 237, 238, 239, 240, 240, 241, 242, 243, 243, 244,
    245, 245, 246, 246, 247, 248, 248, 249, 249, 250, 250, 251, 251, 251, 252, 252,
    252, 253, 253, 253, 254, 254, 254, 254, 254, 255, 255, 255, 255, 255, 255, 255,
];
